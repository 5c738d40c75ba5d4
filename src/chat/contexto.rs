use crate::analise::estrategia::resumo_limpo;
use crate::analise::stakeholders::tabela_stakeholders;
use crate::analise::{colunas, DadosCarregados};
use crate::excel::{Role, StructuredTable};
use crate::models::Dimensao;

const SEM_RESUMO: &str = "Nenhum resumo analítico encontrado.";
const SEM_VISITA: &str = "Nenhum relatório de visita encontrado.";
const SEM_STAKEHOLDERS: &str = "Nenhum stakeholder encontrado.";

fn contexto_resumo(dados: &DadosCarregados) -> String {
    let resumo = dados.tabela(Role::ResumoAnalitico);
    if resumo.is_empty() {
        return SEM_RESUMO.to_string();
    }
    resumo_limpo(resumo).map_or_else(|| SEM_RESUMO.to_string(), |t| t.render_text())
}

fn contexto_visita(dados: &DadosCarregados) -> String {
    let visita = dados.tabela(Role::Visita);
    if visita.is_empty() { SEM_VISITA.to_string() } else { visita.render_text() }
}

/// Parceiros com instituição e potencial preenchidos.
fn parceiros(dados: &DadosCarregados) -> Option<StructuredTable> {
    let tabela = tabela_stakeholders(dados.grade(Role::Economica)?)?;
    let inst = tabela.column(colunas::INSTITUICAO)?;
    let pot = tabela.column(colunas::POTENCIAL)?;
    Some(tabela.without_blank_in(&[inst, pot]))
}

fn contexto_stakeholders(dados: &DadosCarregados) -> String {
    parceiros(dados).map_or_else(|| SEM_STAKEHOLDERS.to_string(), |t| t.render_text())
}

/// Contexto textual entregue ao modelo: métricas, estratégias, visita e
/// parceiros.
pub fn montar_contexto(dados: &DadosCarregados) -> String {
    let m = &dados.metricas;
    let mut out = String::from("DADOS DE CONTEXTO ESTRATÉGICO:\n\nMétricas Chave:\n");
    for dim in [
        Dimensao::Fisica,
        Dimensao::Social,
        Dimensao::Ambiental,
        Dimensao::Urbana,
        Dimensao::Economica,
        Dimensao::Sensorial,
    ] {
        out.push_str(&format!("- Média da Dimensão {}: {:.2}\n", dim.nome(), m.media(dim)));
    }
    out.push_str(&format!("- Índice Territorial (IT) Total: {:.2}\n", m.it_total));
    out.push_str("\nResumo das Estratégias (Aba 'Resumo Analítico'):\n");
    out.push_str(&contexto_resumo(dados));
    out.push_str("\n\nObservações da Visita de Campo (Aba 'Dados de campo'):\n");
    out.push_str(&contexto_visita(dados));
    out.push_str("\n\nParceiros e Stakeholders (da aba Econômica):\n");
    out.push_str(&contexto_stakeholders(dados));
    out.push('\n');
    out
}

pub fn montar_prompt(contexto: &str, pergunta: &str) -> String {
    format!(
        "Você é um assistente de arquitetura sênior do Studio Cosmos.\n\
         Sua tarefa é responder perguntas sobre uma análise de viabilidade de terreno.\n\
         Use **exclusivamente** os dados de contexto abaixo para formular sua resposta.\n\n\
         Se a informação não estiver no contexto, diga \"Essa informação não foi encontrada nos dados carregados\".\n\
         Não invente números ou dados que não estejam no contexto.\n\
         Seja objetivo, profissional e use markdown (como negrito) para destacar os números e pontos-chave.\n\n\
         {}\n\
         PERGUNTA DO USUÁRIO:\n{}\n",
        contexto, pergunta
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analise::carregar_dados;
    use crate::excel::Workbook;

    #[test]
    fn contexto_sem_abas() {
        let dados = carregar_dados(&Workbook::new(vec![("Capa".to_string(), vec![])]));
        let c = montar_contexto(&dados);
        assert!(c.contains("- Média da Dimensão Física: 0.00"));
        assert!(c.contains("- Índice Territorial (IT) Total: 0.00"));
        assert!(c.contains(SEM_RESUMO));
        assert!(c.contains(SEM_VISITA));
        assert!(c.contains(SEM_STAKEHOLDERS));
    }

    #[test]
    fn prompt_termina_com_pergunta() {
        let p = montar_prompt("CTX", "Qual o IT?");
        assert!(p.contains("Studio Cosmos"));
        assert!(p.contains("CTX\n"));
        assert!(p.trim_end().ends_with("Qual o IT?"));
    }
}
