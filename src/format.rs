// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pure helpers building names, references and descriptions of report
//! items.

use itertools::Itertools as _;

use crate::{
    client::{Attribute, Parameter},
    event::{Argument, StepArgument},
};

/// Infix between a keyword and a name.
pub const COLON_INFIX: &str = ": ";

/// Non-breaking space, so padding survives Markdown rendering.
const ONE_SPACE: &str = "&nbsp;";

/// Indentation of a rendered data table.
const TABLE_INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Separator of data table cells.
const TABLE_SEPARATOR: &str = "|";

/// Line break of a rendered data table.
const NEW_LINE: &str = "\r\n";

/// Fence of a rendered docstring.
const DOCSTRING_FENCE: &str = "\"\"\"";

/// Builds a name of a feature or scenario item: `<keyword>: <name>`,
/// followed by the outline `iteration`, if any.
#[must_use]
pub fn node_name(
    keyword: &str,
    name: &str,
    iteration: Option<usize>,
) -> String {
    let mut out = format!("{}{COLON_INFIX}{name}", keyword.trim());
    if let Some(n) = iteration {
        out.push_str(&format!(" {}", outline_iteration(n)));
    }
    out
}

/// Renders a 1-based outline iteration number: `[n]`.
#[must_use]
pub fn outline_iteration(n: usize) -> String {
    format!("[{n}]")
}

/// Builds a prefix marking background steps: `BACKGROUND: `.
#[must_use]
pub fn background_prefix(keyword: &str) -> String {
    format!("{}{COLON_INFIX}", keyword.trim().to_uppercase())
}

/// Builds a name of a step item: `[<prefix>]<keyword> <text>`.
#[must_use]
pub fn step_name(prefix: Option<&str>, keyword: &str, text: &str) -> String {
    format!("{}{} {text}", prefix.unwrap_or_default(), keyword.trim())
}

/// Builds a code reference of a scenario at the given `line`, or of a whole
/// feature if it's `0`.
#[must_use]
pub fn code_ref(uri: &str, line: usize) -> String {
    if line == 0 {
        uri.to_owned()
    } else {
        format!("{uri}:{line}")
    }
}

/// Converts tags into keyless [`Attribute`]s, stripping the leading `@`.
#[must_use]
pub fn tag_attributes<'t>(
    tags: impl IntoIterator<Item = &'t String>,
) -> Vec<Attribute> {
    tags.into_iter()
        .map(|t| Attribute::tag(t.strip_prefix('@').unwrap_or(t)))
        .collect()
}

/// Converts captured step [`Argument`]s into [`Parameter`]s.
///
/// Untyped arguments are keyed by their position: `arg0`, `arg1`, etc.
#[must_use]
pub fn parameters(arguments: &[Argument]) -> Vec<Parameter> {
    arguments
        .iter()
        .enumerate()
        .map(|(i, a)| Parameter {
            key: a.ty.clone().unwrap_or_else(|| format!("arg{i}")),
            value: a.value.clone(),
        })
        .collect()
}

/// Renders a multiline step argument as an item description.
#[must_use]
pub fn multiline_argument(arg: &StepArgument) -> String {
    match arg {
        StepArgument::DocString(s) => {
            format!("{DOCSTRING_FENCE}\n{s}\n{DOCSTRING_FENCE}")
        }
        StepArgument::Table(rows) => data_table(rows),
    }
}

/// Renders a data table with its columns padded to equal widths and cell
/// values centered.
#[must_use]
pub fn data_table(rows: &[Vec<String>]) -> String {
    let widths = (0..rows.iter().map(Vec::len).max().unwrap_or_default())
        .map(|col| {
            rows.iter()
                .filter_map(|r| r.get(col))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    rows.iter()
        .map(|row| {
            let cells = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width - cell.chars().count() + 2;
                    let left = pad / 2;
                    format!(
                        "{}{cell}{}",
                        ONE_SPACE.repeat(left),
                        ONE_SPACE.repeat(pad - left),
                    )
                })
                .join(TABLE_SEPARATOR);
            format!("{TABLE_INDENT}{TABLE_SEPARATOR}{cells}{TABLE_SEPARATOR}")
        })
        .join(NEW_LINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_names() {
        assert_eq!(node_name("Feature", "Belly", None), "Feature: Belly");
        assert_eq!(
            node_name("Scenario Outline", "eating", Some(2)),
            "Scenario Outline: eating [2]",
        );
    }

    #[test]
    fn step_names() {
        assert_eq!(
            step_name(Some(&background_prefix("Background")), "Given ", "a"),
            "BACKGROUND: Given a",
        );
        assert_eq!(step_name(None, "When", "I eat"), "When I eat");
    }

    #[test]
    fn code_refs() {
        assert_eq!(code_ref("f.feature", 0), "f.feature");
        assert_eq!(code_ref("f.feature", 4), "f.feature:4");
    }

    #[test]
    fn strips_tag_marker() {
        let tags = vec!["@smoke".to_owned(), "slow".to_owned()];

        assert_eq!(
            tag_attributes(&tags),
            vec![Attribute::tag("smoke"), Attribute::tag("slow")],
        );
    }

    #[test]
    fn positional_parameter_keys() {
        let params = parameters(&[
            Argument::typed("int", "42"),
            Argument::new("\"string\""),
        ]);

        assert_eq!(params[0].key, "int");
        assert_eq!(params[1].key, "arg1");
        assert_eq!(params[1].value, "\"string\"");
    }

    #[test]
    fn renders_docstring() {
        let doc = StepArgument::DocString("line".into());

        assert_eq!(multiline_argument(&doc), "\"\"\"\nline\n\"\"\"");
    }

    #[test]
    fn renders_padded_table() {
        let rows = vec![
            vec!["a".to_owned(), "bbb".to_owned()],
            vec!["cc".to_owned(), "d".to_owned()],
        ];

        let table = data_table(&rows);
        let lines = table.split(NEW_LINE).collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "&nbsp;&nbsp;&nbsp;&nbsp;|&nbsp;a&nbsp;&nbsp;|&nbsp;bbb&nbsp;|",
        );
        assert_eq!(
            lines[1],
            "&nbsp;&nbsp;&nbsp;&nbsp;|&nbsp;cc&nbsp;|&nbsp;&nbsp;d&nbsp;&nbsp;|",
        );
    }

    #[test]
    fn empty_table_renders_empty() {
        assert_eq!(data_table(&[]), "");
    }
}
