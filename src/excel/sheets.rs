//! Resolução de abas por papel lógico.
//!
//! As planilhas de origem variam pontuação e caixa em volta dos títulos das
//! abas, então cada papel é procurado por substring (sem caixa) e não por
//! nome exato. Empates resolvem para a primeira aba na ordem da pasta.

use serde::Serialize;
use std::collections::BTreeMap;

/// Papel lógico de uma aba esperada, independente do nome literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Urbana,
    Ambiental,
    Social,
    Economica,
    Fisica,
    Sensorial,
    LegislativaAde,
    LegislativaZr3,
    Visita,
    Matriz,
    ResumoAnalitico,
}

impl Role {
    pub const ALL: [Role; 11] = [
        Role::Urbana,
        Role::Ambiental,
        Role::Social,
        Role::Economica,
        Role::Fisica,
        Role::Sensorial,
        Role::LegislativaAde,
        Role::LegislativaZr3,
        Role::Visita,
        Role::Matriz,
        Role::ResumoAnalitico,
    ];

    /// Trecho do nome da aba que identifica o papel.
    pub fn keyword(self) -> &'static str {
        match self {
            Role::Urbana => "KPIs (Urbana)",
            Role::Ambiental => "KPIs (Ambiental)",
            Role::Social => "KPIs (Social)",
            Role::Economica => "KPIs (Econômica)",
            Role::Fisica => "KPIs (Física)",
            Role::Sensorial => "KPIs (Sensorial)",
            Role::LegislativaAde => "KPIs (Legislativa) - ADE",
            Role::LegislativaZr3 => "KPIs (Legislativa) - ZR3",
            Role::Visita => "Dados de campo (Relatório)",
            Role::Matriz => "Matriz, pesos e índices",
            Role::ResumoAnalitico => "Resumo analítico",
        }
    }
}

/// Papel -> nome real da aba (ou ausência). Imutável depois de montado.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleMap {
    resolved: BTreeMap<Role, Option<String>>,
}

impl RoleMap {
    pub fn get(&self, role: Role) -> Option<&str> {
        self.resolved.get(&role).and_then(|o| o.as_deref())
    }

    /// Papéis que não encontraram aba, na ordem de `Role::ALL`.
    pub fn missing(&self) -> Vec<Role> {
        self.resolved.iter().filter(|(_, v)| v.is_none()).map(|(r, _)| *r).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Option<&str>)> {
        self.resolved.iter().map(|(r, v)| (*r, v.as_deref()))
    }
}

/// Primeira aba cujo nome (minúsculo) contém `keyword` (minúsculo).
pub fn find_sheet<'a>(sheet_names: &'a [String], keyword: &str) -> Option<&'a str> {
    let needle = keyword.to_lowercase();
    sheet_names
        .iter()
        .find(|name| name.to_lowercase().contains(&needle))
        .map(|s| s.as_str())
}

/// Resolve cada papel de `roles` contra `sheet_names`.
pub fn resolve_sheets(sheet_names: &[String], roles: &[Role]) -> RoleMap {
    let resolved = roles
        .iter()
        .map(|role| (*role, find_sheet(sheet_names, role.keyword()).map(str::to_string)))
        .collect();
    RoleMap { resolved }
}
