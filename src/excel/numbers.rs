use regex::Regex;
use std::sync::OnceLock;

fn first_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.?\d*)").expect("static regex"))
}

/// Primeiro número de um texto em notação pt-BR.
///
/// Remove todo `.` (milhar) e troca `,` por `.` (decimal) antes de procurar
/// a primeira sequência de dígitos com no máximo um ponto. Um valor que já
/// use `.` como decimal ("2.5") vira 25: é o comportamento herdado das
/// planilhas, mantido de propósito.
///
/// ```
/// use viabilidade::excel::extract_first_number;
/// assert_eq!(extract_first_number("1.234,56"), Some(1234.56));
/// assert_eq!(extract_first_number("N/A"), None);
/// ```
pub fn extract_first_number(text: &str) -> Option<f64> {
    let cleaned = text.replace('.', "").replace(',', ".");
    let m = first_number_re().captures(&cleaned)?.get(1)?;
    m.as_str().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notacao_brasileira() {
        assert_eq!(extract_first_number("1.234,56"), Some(1234.56));
        assert_eq!(extract_first_number("0,6"), Some(0.6));
        assert_eq!(extract_first_number("Máx. 70% do lote"), Some(70.0));
        assert_eq!(extract_first_number("5 m (mínimo)"), Some(5.0));
        assert_eq!(extract_first_number("Cerca de 1.200 pessoas"), Some(1200.0));
    }

    #[test]
    fn sem_numero() {
        assert_eq!(extract_first_number("N/A"), None);
        assert_eq!(extract_first_number(""), None);
        assert_eq!(extract_first_number("livre"), None);
    }

    #[test]
    fn ponto_decimal_vira_milhar() {
        assert_eq!(extract_first_number("2.5"), Some(25.0));
    }

    #[test]
    fn ponto_final_sem_decimais() {
        // "12," vira "12." e o regex aceita o ponto solto
        assert_eq!(extract_first_number("12,"), Some(12.0));
    }
}
