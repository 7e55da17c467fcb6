use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    Registration,
    Name,
    Status,
    GeneralRank,
    QuotaRank,
}

impl Column {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Registration => "registration id",
            Self::Name => "name",
            Self::Status => "status",
            Self::GeneralRank => "general rank",
            Self::QuotaRank => "quota rank",
        }
    }
}

static COLUMN_ALIASES: OnceLock<HashMap<String, Column>> = OnceLock::new();

pub(crate) fn column_for(header: &str) -> Option<Column> {
    column_aliases().get(&normalize_header(header)).copied()
}

fn column_aliases() -> &'static HashMap<String, Column> {
    COLUMN_ALIASES.get_or_init(|| {
        const ALIASES: &[(&str, Column)] = &[
            ("INSCRIÇÃO", Column::Registration),
            ("INSCRICAO", Column::Registration),
            ("INSCRIÇAO", Column::Registration),
            ("registration_id", Column::Registration),
            ("registration", Column::Registration),
            ("NOME", Column::Name),
            ("name", Column::Name),
            ("SITUAÇÃO", Column::Status),
            ("SITUACAO", Column::Status),
            ("status", Column::Status),
            ("CLAS. AMPLA", Column::GeneralRank),
            ("CLASS. AMPLA", Column::GeneralRank),
            ("general_rank", Column::GeneralRank),
            ("CLAS. COTAS", Column::QuotaRank),
            ("CLASS. COTAS", Column::QuotaRank),
            ("quota_rank", Column::QuotaRank),
        ];

        ALIASES
            .iter()
            .map(|(alias, column)| (normalize_header(alias), *column))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_source_and_english_headers() {
        assert_eq!(column_for(" Inscrição "), Some(Column::Registration));
        assert_eq!(column_for("INSCRICAO"), Some(Column::Registration));
        assert_eq!(column_for("clas.  cotas"), Some(Column::QuotaRank));
        assert_eq!(column_for("general_rank"), Some(Column::GeneralRank));
        assert_eq!(column_for("NOTA TOTAL"), None);
    }
}
