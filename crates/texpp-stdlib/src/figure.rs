//! The `figure` operation

use texpp::{Args, OperationError};

const PARAMS: [&str; 6] = ["file", "caption", "width", "twocolumn", "placement", "hspace"];

/// Return a centered figure environment including a single graphic.
///
/// Parameters, in positional order:
///     `file`, `caption`, `width`, `twocolumn`, `placement` (default `h`) and `hspace`.
/// If there is a caption, the figure is labelled `fig:<file>`.
pub fn figure(args: &Args) -> Result<String, OperationError> {
    args.check_signature(&PARAMS)?;
    let file = args.required(0, "file")?;
    let caption = args.param(1, "caption")?;
    let width = args.param(2, "width")?;
    let twocolumn = match args.param(3, "twocolumn")? {
        None => false,
        Some(value) => crate::parse_flag("twocolumn", value)?,
    };
    let placement = args.param_or(4, "placement", "h")?;
    let hspace = args.param(5, "hspace")?;

    let env = if twocolumn { "figure*" } else { "figure" };
    let mut s = format!["\\begin{{{env}}}[{placement}]\n\\centering\n"];
    if let Some(hspace) = hspace {
        s.push_str(&format!["\\hspace*{{{hspace}}}\n"]);
    }
    s.push_str("\\includegraphics");
    if let Some(width) = width {
        s.push_str(&format!["[width={width}]"]);
    }
    s.push_str(&format!["{{{file}}}\n"]);
    if let Some(caption) = caption {
        s.push_str(&format![
            "\\caption{{\\small{{{caption}}}\\label{{fig:{file}}}\\nopagebreak}}\n"
        ]);
    }
    s.push_str(&format!["\\end{{{env}}}\n"]);
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_figure() {
        let args = Args::default()
            .with_keyword("file", "img/test")
            .with_keyword("caption", "test")
            .with_keyword("width", "3in");
        similar_asserts::assert_eq!(
            figure(&args).unwrap(),
            r"\begin{figure}[h]
\centering
\includegraphics[width=3in]{img/test}
\caption{\small{test}\label{fig:img/test}\nopagebreak}
\end{figure}
"
        );
    }

    #[test]
    fn two_column_figure() {
        let args = Args::default()
            .with_positional("plot.png")
            .with_keyword("twocolumn", "true")
            .with_keyword("placement", "t")
            .with_keyword("hspace", "-1cm");
        similar_asserts::assert_eq!(
            figure(&args).unwrap(),
            r"\begin{figure*}[t]
\centering
\hspace*{-1cm}
\includegraphics{plot.png}
\end{figure*}
"
        );
    }

    #[test]
    fn file_is_required() {
        let args = Args::default().with_keyword("caption", "x");
        assert_eq!(
            figure(&args),
            Err(OperationError::MissingArgument {
                name: "file".into()
            })
        );
    }

    #[test]
    fn unknown_keyword() {
        let args = Args::default()
            .with_positional("plot.png")
            .with_keyword("capton", "x");
        assert!(matches!(
            figure(&args),
            Err(OperationError::UnknownKeyword { .. })
        ));
    }
}
