//! The `table` operation
//!
//! Tables are written as plain text, one row per line with cells separated by `|`.
//! A row of dashes marks the row above it as a header, which is shaded:
//!
//! ```tex
//! \c\table{
//!     Setting         | Value
//!     ---------------------------
//!     Frequency Range | 20 MHz -- 3 GHz
//!     Sample points   | 1500
//! }[caption=Settings, label=settings]
//! ```
//!
//! Shading uses `\rowcolor`, so documents need `\usepackage[table]{xcolor}`.

use texpp::{Args, OperationError};

const PARAMS: [&str; 9] = [
    "data",
    "row",
    "column",
    "placement",
    "caption",
    "label",
    "padding",
    "header_color",
    "alignment",
];

pub fn table(args: &Args) -> Result<String, OperationError> {
    args.check_signature(&PARAMS)?;
    let data = args.required(0, "data")?;
    let row = args.param_or(1, "row", "\n")?;
    let column = args.param_or(2, "column", "|")?;
    let placement = args.param_or(3, "placement", "h")?;
    let caption = args.param(4, "caption")?;
    let label = args.param(5, "label")?;
    let padding = args.param_or(6, "padding", "1.4")?;
    let header_color = args.param_or(7, "header_color", "gray!30!white")?;
    let alignment = args.param(8, "alignment")?;
    if row.is_empty() || column.is_empty() {
        return Err(OperationError::Failed(
            "row and column delimiters must not be empty".into(),
        ));
    }

    let data = if column == "&" {
        data.to_string()
    } else {
        data.replace('&', "\\&")
    };
    let rows: Vec<Vec<&str>> = data
        .trim()
        .split(row)
        .map(|r| r.split(column).map(str::trim).collect())
        .collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut body = String::new();
    for (i, cells) in rows.iter().enumerate() {
        if is_rule(cells) || cells[0].is_empty() {
            continue;
        }
        if rows.get(i + 1).map(|next| is_rule(next)).unwrap_or(false) {
            body.push_str(&format!["\\rowcolor{{{header_color}}}\n"]);
        }
        body.push_str(&cells.join(" & "));
        body.push_str("\\\\\\hline\n");
    }

    let mut s = format!["\\begin{{table}}[{placement}]\n\\begin{{center}}\n"];
    if let (Some(caption), Some(label)) = (caption, label) {
        s.push_str(&format![
            "\\caption{{\\label{{tab:{label}}}{{\\small {caption}}}}}\n"
        ]);
    }
    s.push_str(&format!["\\renewcommand{{\\arraystretch}}{{{padding}}}\n"]);
    let alignment = match alignment {
        Some(alignment) => alignment.to_string(),
        None => vec!["l"; columns].join(" "),
    };
    s.push_str(&format!["\\begin{{tabular}}{{{alignment}}}\n"]);
    s.push_str(&body);
    s.push_str("\\end{tabular}\n\\end{center}\n\\end{table}");
    Ok(s)
}

/// Whether the row is a header rule: its first cell is a non-empty run of dashes.
fn is_rule(cells: &[&str]) -> bool {
    cells
        .first()
        .map(|cell| !cell.is_empty() && cell.chars().all(|c| c == '-'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "
        Setting         | Value
        ------------------------------
        Frequency Range | 20 MHz -- 3 GHz
        Sample points   | 1500
        IF Bandwidth    | 300 kHz
    ";

    #[test]
    fn table_with_header() {
        let args = Args::default().with_positional(DATA);
        similar_asserts::assert_eq!(
            table(&args).unwrap(),
            r"\begin{table}[h]
\begin{center}
\renewcommand{\arraystretch}{1.4}
\begin{tabular}{l l}
\rowcolor{gray!30!white}
Setting & Value\\\hline
Frequency Range & 20 MHz -- 3 GHz\\\hline
Sample points & 1500\\\hline
IF Bandwidth & 300 kHz\\\hline
\end{tabular}
\end{center}
\end{table}"
        );
    }

    #[test]
    fn table_with_caption_and_custom_delimiters() {
        let args = Args::default()
            .with_positional("a,b;c,d&e")
            .with_keyword("row", ";")
            .with_keyword("column", ",")
            .with_keyword("caption", "Letters")
            .with_keyword("label", "letters")
            .with_keyword("alignment", "|c|c|");
        similar_asserts::assert_eq!(
            table(&args).unwrap(),
            r"\begin{table}[h]
\begin{center}
\caption{\label{tab:letters}{\small Letters}}
\renewcommand{\arraystretch}{1.4}
\begin{tabular}{|c|c|}
a & b\\\hline
c & d\&e\\\hline
\end{tabular}
\end{center}
\end{table}"
        );
    }

    #[test]
    fn blank_rows_are_skipped() {
        let args = Args::default().with_positional("a | b\n\nc | d");
        let got = table(&args).unwrap();
        assert!(got.contains("a & b\\\\\\hline\nc & d\\\\\\hline\n"));
        assert!(!got.contains("rowcolor"));
    }

    #[test]
    fn empty_delimiter() {
        let args = Args::default()
            .with_positional("a")
            .with_keyword("column", "");
        assert!(matches!(table(&args), Err(OperationError::Failed(_))));
    }
}
