/// Canonical form for column headers: no BOM, single spaces, upper case.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_uppercase()
}

const SUB_JUDICE_MARKER: &str = "sub judice";

pub(crate) fn has_sub_judice_marker(name: &str) -> bool {
    name.to_lowercase().contains(SUB_JUDICE_MARKER)
}

/// Parses a rank cell. Empty cells are "no rank"; `,` and `.` both work as decimal separator,
/// but the value must be a positive whole number.
pub(crate) fn parse_rank(raw: &str) -> Result<Option<u32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("'{trimmed}' is not a number"))?;

    if !value.is_finite() || value < 1.0 || value > f64::from(u32::MAX) {
        return Err(format!("'{trimmed}' is outside the valid rank range"));
    }
    if value.fract() != 0.0 {
        return Err(format!("'{trimmed}' is not a whole rank"));
    }

    Ok(Some(value as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_lose_bom_spacing_and_case() {
        assert_eq!(normalize_header("\u{feff} clas.  ampla "), "CLAS. AMPLA");
        assert_eq!(normalize_header("Inscrição"), "INSCRIÇÃO");
    }

    #[test]
    fn marker_is_case_insensitive() {
        assert!(has_sub_judice_marker("MARIA SILVA (SUB JUDICE)"));
        assert!(has_sub_judice_marker("Maria Silva (Sub Judice)"));
        assert!(!has_sub_judice_marker("Maria Silva"));
    }

    #[test]
    fn ranks_accept_both_decimal_separators() {
        assert_eq!(parse_rank("12"), Ok(Some(12)));
        assert_eq!(parse_rank(" 12,0 "), Ok(Some(12)));
        assert_eq!(parse_rank("12.0"), Ok(Some(12)));
        assert_eq!(parse_rank(""), Ok(None));
    }

    #[test]
    fn ranks_reject_garbage() {
        assert!(parse_rank("abc").is_err());
        assert!(parse_rank("0").is_err());
        assert!(parse_rank("-4").is_err());
        assert!(parse_rank("3,5").is_err());
    }
}
