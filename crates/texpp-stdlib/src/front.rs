//! Front matter: the `titleblock` and `abstract` operations

use texpp::{Args, OperationError};

/// Return `\title`, `\author` and `\maketitle`.
///
/// The subtitle, author and date are stacked in the author block.
/// If no date is given `\today` is used.
pub fn titleblock(args: &Args) -> Result<String, OperationError> {
    args.check_signature(&["title", "subtitle", "author", "date"])?;
    let title = args.required(0, "title")?;
    let subtitle = args.param(1, "subtitle")?;
    let author = args.param(2, "author")?;
    let date = args.param(3, "date")?;

    let lines: Vec<&str> = [subtitle, author, Some(date.unwrap_or("\\today"))]
        .into_iter()
        .flatten()
        .collect();
    Ok(format![
        "\\title{{{title}}}\n\\author{{{}}}\\maketitle",
        lines.join(" \\\\ ")
    ])
}

/// Return an inline abstract with a bold italic heading.
pub fn abstract_(args: &Args) -> Result<String, OperationError> {
    args.check_signature(&["text", "title"])?;
    let text = args.required(0, "text")?;
    let title = args.param_or(1, "title", "Abstract")?;
    Ok(format![
        "\\noindent\\textbf{{\\textit{{{title}}}--- {}}}",
        text.trim()
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! titleblock_tests {
        ( $( ($name: ident, $args: expr, $want: expr), )+ ) => {
            $(
            #[test]
            fn $name() {
                similar_asserts::assert_eq!(titleblock(&$args).unwrap(), $want);
            }
            )+
        };
    }

    titleblock_tests!(
        (
            title_only,
            Args::default().with_positional("On Engines"),
            "\\title{On Engines}\n\\author{\\today}\\maketitle"
        ),
        (
            title_author_date,
            Args::default()
                .with_positional("On Engines")
                .with_keyword("author", "Ada")
                .with_keyword("date", "1843"),
            "\\title{On Engines}\n\\author{Ada \\\\ 1843}\\maketitle"
        ),
        (
            title_subtitle_author,
            Args::default()
                .with_positional("On Engines")
                .with_positional("Notes")
                .with_positional("Ada"),
            "\\title{On Engines}\n\\author{Notes \\\\ Ada \\\\ \\today}\\maketitle"
        ),
    );

    #[test]
    fn abstract_default_title() {
        let args = Args::default().with_positional("  We show things. ");
        assert_eq!(
            abstract_(&args).unwrap(),
            "\\noindent\\textbf{\\textit{Abstract}--- We show things.}"
        );
    }

    #[test]
    fn abstract_requires_text() {
        assert_eq!(
            abstract_(&Args::default()),
            Err(OperationError::MissingArgument {
                name: "text".into()
            })
        );
    }
}
