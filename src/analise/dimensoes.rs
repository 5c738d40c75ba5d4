use serde::Serialize;

use crate::analise::avisos::Avisos;
use crate::analise::carga::DadosCarregados;
use crate::analise::colunas;
use crate::analise::stakeholders::{analisar_stakeholders, Stakeholder};
use crate::excel::{match_image_name, StructuredTable};
use crate::models::Dimensao;

#[derive(Debug, Clone, Serialize)]
pub struct PontoGrafico {
    pub indicador: String,
    pub escala: f64,
}

/// Referência de mapa escrita na planilha e o arquivo enviado que a atende.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefMapa {
    pub referencia: String,
    pub arquivo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetalheIndicador {
    pub indicador: String,
    pub nota: f64,
    pub mapas: Vec<RefMapa>,
    pub analise: Option<String>,
    pub relacao_projeto: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginaDimensao {
    pub dimensao: &'static str,
    pub media: f64,
    /// Perfil da dimensão: nota por indicador.
    pub grafico: Vec<PontoGrafico>,
    pub detalhes: Vec<DetalheIndicador>,
    /// A tabela inteira, quando as colunas de detalhe não foram achadas.
    pub tabela: Option<StructuredTable>,
    /// Só na dimensão Econômica.
    pub stakeholders: Option<Vec<Stakeholder>>,
    pub avisos: Avisos,
}

/// Resolve as referências separadas por vírgula contra os nomes enviados.
pub fn resolver_mapas<S: AsRef<str>>(celula: &str, imagens: &[S], avisos: &mut Avisos) -> Vec<RefMapa> {
    celula
        .split(',')
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .map(|referencia| {
            let arquivo = match_image_name(&referencia, imagens).map(str::to_string);
            if arquivo.is_none() {
                avisos.aviso(format!(
                    "O mapa '{0}' foi referenciado, mas um arquivo correspondente (ex: '{0}.png') não foi encontrado nos uploads.",
                    referencia
                ));
            }
            RefMapa { referencia, arquivo }
        })
        .collect()
}

pub fn montar_dimensao<S: AsRef<str>>(dados: &DadosCarregados, dim: Dimensao, imagens: &[S]) -> PaginaDimensao {
    let mut avisos = Avisos::new();
    let tabela = dados.tabela(dim.role());
    let mut pagina = PaginaDimensao {
        dimensao: dim.nome(),
        media: dados.metricas.media(dim),
        grafico: Vec::new(),
        detalhes: Vec::new(),
        tabela: None,
        stakeholders: None,
        avisos: Avisos::new(),
    };

    if tabela.is_empty() {
        avisos.aviso(format!(
            "Dados da dimensão '{}' não encontrados. Verifique a aba correspondente no Excel.",
            dim.nome()
        ));
        pagina.avisos = avisos;
        return pagina;
    }

    let col_escala = tabela.column(colunas::ESCALA);
    let col_indicador = tabela.column(colunas::INDICADOR);
    let col_analise = tabela.column(colunas::ANALISE);
    let col_projeto = tabela.column(colunas::PROJETO);
    let col_mapa = tabela.column(colunas::MAPA);

    match (col_indicador, col_escala) {
        (Some(ind), Some(esc)) => {
            let validas = tabela.without_blank_in(&[ind, esc]);
            pagina.grafico = (0..validas.len())
                .filter_map(|r| {
                    Some(PontoGrafico { indicador: validas.text(r, ind)?, escala: validas.cell(r, esc).as_number()? })
                })
                .collect();
            if pagina.grafico.is_empty() {
                avisos.aviso(format!("Não há dados válidos para o gráfico de perfil da dimensão '{}'.", dim.nome()));
            }
        }
        _ => avisos.aviso(format!(
            "Não foi possível gerar o gráfico de perfil para '{}'. Colunas 'INDICADOR' ou 'ESCALA' não encontradas.",
            dim.nome()
        )),
    }

    match (col_analise, col_projeto, col_indicador, col_escala) {
        (Some(an), Some(pr), Some(ind), Some(esc)) => {
            let validas = tabela.without_blank_in(&[ind, esc]);
            for r in 0..validas.len() {
                let Some(nota) = validas.cell(r, esc).as_number() else { continue };
                let mapas = match col_mapa.and_then(|c| validas.text(r, c)) {
                    Some(celula) => resolver_mapas(&celula, imagens, &mut avisos),
                    None => Vec::new(),
                };
                pagina.detalhes.push(DetalheIndicador {
                    indicador: validas.text(r, ind).unwrap_or_default(),
                    nota,
                    mapas,
                    analise: validas.text(r, an),
                    relacao_projeto: validas.text(r, pr),
                });
            }
        }
        _ => {
            avisos.erro("Não foi possível encontrar as colunas 'Indicador', 'Análise' ou 'Relação' no Excel.");
            pagina.tabela = Some(tabela.clone());
        }
    }

    if dim == Dimensao::Economica {
        let mut avisos_eco = Avisos::new();
        pagina.stakeholders = Some(analisar_stakeholders(dados.grade(dim.role()), &mut avisos_eco));
        avisos.extend(avisos_eco);
    }

    pagina.avisos = avisos;
    pagina
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapas_resolvidos_e_faltantes() {
        let imagens = vec!["Mapa_Uso_Solo.png".to_string(), "relevo.jpg".to_string()];
        let mut avisos = Avisos::new();
        let refs = resolver_mapas("Uso_Solo, Hidrografia ,", &imagens, &mut avisos);
        assert_eq!(
            refs,
            vec![
                RefMapa { referencia: "uso_solo".into(), arquivo: Some("Mapa_Uso_Solo.png".into()) },
                RefMapa { referencia: "hidrografia".into(), arquivo: None },
            ]
        );
        assert!(avisos.contem("'hidrografia'"));
    }
}
