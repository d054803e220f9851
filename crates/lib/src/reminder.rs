//! Clock-in reminder template.
//!
//! The rendered body is deterministic from the caregiver's first name and
//! shift time, and embeds the fixed three-option reply menu as literal text
//! (the inbound webhook just stores whatever the caregiver typed back).

/// First name = substring before the first space of the full name.
pub fn first_name(full_name: &str) -> &str {
    full_name.split(' ').next().unwrap_or(full_name)
}

/// Render the outbound reminder body.
pub fn render(caregiver_name: &str, shift_time: &str) -> String {
    format!(
        "Hi {}, this is Alden 👋 You're scheduled to clock in at {}. Please reply:\n\n1 – Running late\n2 – Having technical issues\n3 – Forgot to clock in",
        first_name(caregiver_name),
        shift_time
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_is_substring_before_first_space() {
        assert_eq!(first_name("Liam Johnson"), "Liam");
        assert_eq!(first_name("Grace Anderson"), "Grace");
        assert_eq!(first_name("Cher"), "Cher");
        assert_eq!(first_name(""), "");
    }

    #[test]
    fn rendered_first_line_is_exact() {
        let body = render("Liam Johnson", "9:00 AM");
        let first_line = body.lines().next().unwrap();
        assert_eq!(
            first_line,
            "Hi Liam, this is Alden 👋 You're scheduled to clock in at 9:00 AM. Please reply:"
        );
    }

    #[test]
    fn rendered_body_carries_the_fixed_reply_menu() {
        let body = render("Grace Anderson", "8:00 AM");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Hi Grace, this is Alden 👋 You're scheduled to clock in at 8:00 AM. Please reply:",
                "",
                "1 – Running late",
                "2 – Having technical issues",
                "3 – Forgot to clock in",
            ]
        );
    }
}
