#![allow(dead_code)]

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

/// Escreve as linhas na aba; texto que parseia como f64 vira número.
fn escrever(ws: &mut Worksheet, linhas: &[&[&str]]) -> Result<(), XlsxError> {
    for (r, linha) in linhas.iter().enumerate() {
        for (c, valor) in linha.iter().enumerate() {
            if valor.is_empty() {
                continue;
            }
            match valor.parse::<f64>() {
                Ok(n) => ws.write_number(r as u32, c as u16, n)?,
                Err(_) => ws.write_string(r as u32, c as u16, *valor)?,
            };
        }
    }
    Ok(())
}

pub fn pasta_xlsx(abas: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut wb = Workbook::new();
    for (nome, linhas) in abas {
        let ws = wb.add_worksheet();
        ws.set_name(*nome).expect("nome de aba");
        escrever(ws, linhas).expect("escrita da aba");
    }
    wb.save_to_buffer().expect("xlsx em memória")
}

pub const VISITA: &[&[&str]] = &[
    &["SEÇÃO", "ASPECTO / DADO", "OBSERVAÇÕES / RESPOSTAS"],
    &["Geral", "Fotografias capturadas", "24"],
    &["", "Largura da calçada principal", "2,5 m"],
    &["", "Fluxo médio de pedestres", "15 pessoas"],
    &["Ambiente", "Sons e ruídos predominantes", "Trânsito intenso e pessoas"],
    &["", "Ruídos e odores", "Ruído de ônibus no pico"],
    &["", "Condições climáticas", "Ensolarado"],
    &["", "Nível de segurança", "Moderado"],
    &["", "Topografia e drenagem", "Plana, sem alagamentos"],
];

pub const URBANA: &[&[&str]] = &[
    &["INDICADOR", "ESCALA (0–5)", "ANÁLISE", "RELAÇÃO COM O PROJETO", "MAPA CORRESPONDENTE"],
    &["Mobilidade", "4", "Boa oferta de ônibus", "Priorizar acesso a pé", ""],
    &["Uso do solo", "3", "Predomínio residencial", "Programa misto", "uso_solo, hidrografia"],
    &["Comentário geral", "n/d", "", "", ""],
];

pub const ECONOMICA: &[&[&str]] = &[
    &["INDICADOR", "ESCALA", "ANÁLISE", "RELAÇÃO"],
    &["Renda", "2", "Renda média baixa", "Preço acessível"],
    &["Emprego", "3", "Comércio local", "Térreo ativo"],
    &["", "", "", ""],
    &["Instituição", "Localização", "Potencial", ""],
    &["Associação de moradores", "Bairro", "Médio", ""],
    &["Universidade", "Centro", "Alto", ""],
    &["Cooperativa", "", "Baixo", ""],
];

pub const MATRIZ: &[&[&str]] = &[
    &["DIMENSÃO", "INDICADOR", "ESCALA", "PESO", "VALOR PONDERADO"],
    &["Urbana", "Mobilidade", "4", "0.3", "1.2"],
    &["Econômica", "Renda", "2", "0.2", "0.4"],
    &["Índice Territorial (IT)", "", "3.8", "", ""],
    &["Interpretação", "Alto potencial", "", "", ""],
];

pub const ADE: &[&[&str]] = &[
    &["KPIs (Legislativa) - ADE"],
    &["Indicador", "Valor Indicado"],
    &["Taxa de Ocupação", "70%"],
    &["Coeficiente de Aproveitamento", "2,0"],
    &["Usos", "Adequação"],
    &["Residencial", "Adequado"],
    &["Industrial", "Proibido"],
    &["Serviços", ""],
];

pub const ZR3: &[&[&str]] = &[
    &["KPIs (Legislativa) - ZR3"],
    &["Indicador", "Valor Indicado"],
    &["Taxa de Ocupação", "50%"],
    &["Afast. Frontal", "4 m"],
    &["Usos", "Adequação"],
    &["Residencial", "Adequado"],
    &["Comercial", "Não adequado"],
];

pub const RESUMO: &[&[&str]] = &[
    &["DIMENSÃO", "SITUAÇÃO", "POTENCIAL", "ESTRATÉGIA"],
    &["Urbana", "Boa conectividade", "Alto", "Fachada ativa"],
    &["➡️ Mobilidade", "detalhe", "", ""],
    &["Econômica", "Renda baixa", "Médio", ""],
];

/// Pasta completa menos as abas Ambiental, Social, Física e Sensorial.
pub fn pasta_padrao() -> Vec<u8> {
    pasta_xlsx(&[
        ("Capa", &[&["Estudo de viabilidade"]]),
        ("1) Dados de campo (Relatório)", VISITA),
        ("2) KPIs (Urbana)", URBANA),
        ("2) KPIs (Econômica)", ECONOMICA),
        ("2) KPIs (Legislativa) - ADE", ADE),
        ("2) KPIs (Legislativa) - ZR3", ZR3),
        ("3) Matriz, pesos e índices", MATRIZ),
        ("4) Resumo analítico", RESUMO),
    ])
}
