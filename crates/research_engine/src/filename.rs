/// Download name for a report: `research_report_{topic}.txt`, where every
/// whitespace run in the topic becomes one underscore.
pub fn report_filename(topic: &str) -> String {
    format!("research_report_{}.txt", sanitize_topic(topic))
}

fn sanitize_topic(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len());
    let mut in_whitespace = false;
    for c in topic.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        out.push(if is_forbidden(c) { '_' } else { c });
    }
    out
}

// Characters that would escape the download directory or are invalid on Windows.
fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

#[cfg(test)]
mod tests {
    use super::report_filename;

    #[test]
    fn whitespace_runs_become_single_underscore() {
        assert_eq!(report_filename("AI Ethics"), "research_report_AI_Ethics.txt");
        assert_eq!(
            report_filename("climate \t change\nnow"),
            "research_report_climate_change_now.txt"
        );
    }

    #[test]
    fn edge_whitespace_is_kept_as_underscore() {
        assert_eq!(report_filename(" AI "), "research_report__AI_.txt");
    }

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(
            report_filename("../etc/passwd"),
            "research_report_.._etc_passwd.txt"
        );
    }
}
