use console::Style;
use skein_bind::method_table::MethodKind;
use skein_types::abi::Param;

pub fn style_success() -> Style {
    Style::new().green()
}

pub fn style_error() -> Style {
    Style::new().red()
}

pub fn style_info() -> Style {
    Style::new().cyan()
}

pub fn style_bold() -> Style {
    Style::new().bold()
}

pub fn style_dim() -> Style {
    Style::new().dim()
}

/// Render a parameter list as `name: type, ...`. Unnamed params show the type only.
pub fn format_params(params: &[Param]) -> String {
    if params.is_empty() {
        return "-".to_string();
    }
    params
        .iter()
        .map(|p| {
            if p.name.is_empty() {
                p.ty.clone()
            } else {
                format!("{}: {}", p.name, p.ty)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Colored method kind label.
pub fn format_kind(kind: MethodKind) -> String {
    let style = match kind {
        MethodKind::Read => style_info(),
        MethodKind::Write => Style::new().yellow(),
    };
    style.apply_to(kind.as_str()).to_string()
}

pub fn print_success(msg: &str) {
    println!("  {} {}", style_success().apply_to("✓"), msg);
}

pub fn print_error(msg: &str, hint: Option<&str>) {
    eprintln!("  {} {}", style_error().apply_to("✗"), msg);
    if let Some(hint) = hint {
        eprintln!("    {}", style_dim().apply_to(hint));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_params() {
        assert_eq!(format_params(&[]), "-");
        assert_eq!(
            format_params(&[Param::new("to", "string"), Param::new("amount", "integer")]),
            "to: string, amount: integer"
        );
        assert_eq!(format_params(&[Param::new("", "integer")]), "integer");
    }

    #[test]
    fn test_format_kind_contains_label() {
        assert!(format_kind(MethodKind::Read).contains("read"));
        assert!(format_kind(MethodKind::Write).contains("write"));
    }
}
