use crate::model::{Answer, ResultView};

/// Renders result rows as a `;`-separated export. Answers come out as a
/// space-joined `qN:V` list; embedded newlines and separators in any field
/// are flattened so each row stays one line.
pub fn render_results(rows: &[ResultView]) -> String {
    let mut out = String::from("id;user;email;score;answers;created_at\n");
    for r in rows {
        let answers = r.answers.as_deref().map(format_answers).unwrap_or_default();
        let fields = [
            r.id.to_string(),
            r.name.clone(),
            r.email.clone(),
            r.score.to_string(),
            answers,
            r.created_at.clone(),
        ];
        let line = fields
            .iter()
            .map(|v| sanitize(v))
            .collect::<Vec<_>>()
            .join(";");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn format_answers(answers: &[Answer]) -> String {
    answers
        .iter()
        .map(|a| format!("q{}:{}", a.id, a.value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sanitize(v: &str) -> String {
    v.replace('\n', " ").replace(';', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, answers: Option<Vec<Answer>>) -> ResultView {
        ResultView {
            id: 1,
            user_id: 1,
            name: name.into(),
            email: "a@b.c".into(),
            answers,
            score: 8,
            created_at: "2026-08-01 10:00:00".into(),
        }
    }

    #[test]
    fn test_csv_layout() {
        let rows = vec![row(
            "Ana",
            Some(vec![Answer { id: 1, value: 5 }, Answer { id: 2, value: 3 }]),
        )];
        let csv = render_results(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id;user;email;score;answers;created_at"));
        assert_eq!(
            lines.next(),
            Some("1;Ana;a@b.c;8;q1:5 q2:3;2026-08-01 10:00:00")
        );
    }

    #[test]
    fn test_csv_sanitizes_separators() {
        let csv = render_results(&[row("A;B\nC", None)]);
        assert!(csv.lines().nth(1).unwrap().starts_with("1;A,B C;"));
    }

    #[test]
    fn test_csv_unparsed_answers_render_empty() {
        let csv = render_results(&[row("Ana", None)]);
        assert_eq!(csv.lines().nth(1), Some("1;Ana;a@b.c;8;;2026-08-01 10:00:00"));
    }
}
