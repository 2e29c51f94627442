//! First pass over a (comment-masked) source: label definitions, environment
//! extents, sectioning commands and reference-macro invocations, all in
//! offset order. No attribution happens here.

use regex::Regex;

use super::MacroConfig;

/// Sectioning commands that end any running label span.
const SECTION_PATTERN: &str =
    r"\\(?:part|chapter|section|subsection|subsubsection|paragraph)\b";

const ENV_PATTERN: &str = r"\\(begin|end)\s*\{([^{}]*)\}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LabelDef {
    pub name: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Environment {
    pub name: String,
    /// Offset of `\begin`
    pub begin: usize,
    /// Offset just past the matching `\end{...}`
    pub end: usize,
}

impl Environment {
    pub fn encloses(&self, offset: usize) -> bool {
        self.begin <= offset && offset < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MacroUse {
    pub macro_name: String,
    pub offset: usize,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FileScan {
    pub labels: Vec<LabelDef>,
    /// Sorted by `begin`
    pub environments: Vec<Environment>,
    pub sections: Vec<usize>,
    pub macro_uses: Vec<MacroUse>,
    /// (offset, message) pairs for malformed input
    pub warnings: Vec<(usize, String)>,
}

/// Outcome of reading a braced macro argument.
#[derive(Debug, PartialEq, Eq)]
enum Argument {
    Found(String),
    /// No `{` follows: not an invocation we understand
    Missing,
    /// `{` without a closing brace before a blank line or end of input
    Unterminated,
}

pub(crate) struct Scanner {
    label_re: Regex,
    reference_re: Option<Regex>,
    env_re: Regex,
    section_re: Regex,
}

/// Build `\\(?:name1|name2|...)` with longer names first so that `\ref`
/// never shadows `\reflem`.
fn alternation(names: impl Iterator<Item = String>) -> Option<String> {
    let mut names: Vec<String> = names.filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        return None;
    }
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();
    let escaped: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();
    Some(format!(r"\\({})", escaped.join("|")))
}

impl Scanner {
    pub fn new(config: &MacroConfig) -> Result<Self, regex::Error> {
        let label_pattern = alternation(config.label_macros.iter().cloned())
            .unwrap_or_else(|| r"\\(label)".to_string());
        let reference_pattern = alternation(
            config
                .references
                .iter()
                .chain(config.future_references.iter())
                .cloned(),
        );

        Ok(Self {
            label_re: Regex::new(&label_pattern)?,
            reference_re: reference_pattern.map(|p| Regex::new(&p)).transpose()?,
            env_re: Regex::new(ENV_PATTERN)?,
            section_re: Regex::new(SECTION_PATTERN)?,
        })
    }

    pub fn scan(&self, text: &str) -> FileScan {
        let mut scan = FileScan::default();
        self.scan_labels(text, &mut scan);
        self.scan_environments(text, &mut scan);
        scan.sections = self.section_re.find_iter(text).map(|m| m.start()).collect();
        self.scan_references(text, &mut scan);
        scan.warnings.sort_by_key(|(offset, _)| *offset);
        scan
    }

    fn scan_labels(&self, text: &str, scan: &mut FileScan) {
        for caps in self.label_re.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if continues_macro_name(text, whole.end()) {
                continue;
            }
            match read_argument(text, whole.end()) {
                Argument::Found(arg) => {
                    let label = arg.trim();
                    if label.contains('#') {
                        // Macro parameter inside a definition body, e.g.
                        // \newcommand{\thmlabel}[1]{\label{thm:#1}}
                        continue;
                    }
                    if label.is_empty() {
                        scan.warnings
                            .push((whole.start(), format!("empty \\{} argument", name.as_str())));
                    } else {
                        scan.labels.push(LabelDef {
                            name: label.to_string(),
                            offset: whole.start(),
                        });
                    }
                }
                Argument::Unterminated => scan.warnings.push((
                    whole.start(),
                    format!("unterminated \\{} argument", name.as_str()),
                )),
                Argument::Missing => {}
            }
        }
    }

    fn scan_environments(&self, text: &str, scan: &mut FileScan) {
        let mut stack: Vec<usize> = Vec::new();

        for caps in self.env_re.captures_iter(text) {
            let (Some(whole), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let name = name.as_str().trim();

            if kind.as_str() == "begin" {
                stack.push(scan.environments.len());
                scan.environments.push(Environment {
                    name: name.to_string(),
                    begin: whole.start(),
                    end: text.len(),
                });
                continue;
            }

            match stack
                .iter()
                .rposition(|&idx| scan.environments[idx].name == name)
            {
                Some(depth) => {
                    // Anything opened after the match is implicitly closed here
                    for idx in stack.drain(depth + 1..).rev() {
                        let env = &mut scan.environments[idx];
                        env.end = whole.start();
                        scan.warnings.push((
                            env.begin,
                            format!("\\begin{{{}}} is closed by \\end{{{}}}", env.name, name),
                        ));
                    }
                    if let Some(idx) = stack.pop() {
                        scan.environments[idx].end = whole.end();
                    }
                }
                None => scan.warnings.push((
                    whole.start(),
                    format!("\\end{{{}}} without matching \\begin", name),
                )),
            }
        }

        for idx in stack {
            let env = &scan.environments[idx];
            if env.name != "document" {
                scan.warnings
                    .push((env.begin, format!("\\begin{{{}}} is never closed", env.name)));
            }
        }
    }

    fn scan_references(&self, text: &str, scan: &mut FileScan) {
        let Some(reference_re) = &self.reference_re else {
            return;
        };

        for caps in reference_re.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if continues_macro_name(text, whole.end()) {
                continue;
            }
            let macro_name = name.as_str().to_string();

            match read_argument(text, whole.end()) {
                Argument::Found(arg) => {
                    let targets: Vec<String> = arg
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .filter(|t| !t.starts_with('#'))
                        .map(str::to_string)
                        .collect();
                    if targets.is_empty() {
                        if !arg.contains('#') {
                            scan.warnings
                                .push((whole.start(), format!("empty \\{} argument", macro_name)));
                        }
                        continue;
                    }
                    scan.macro_uses.push(MacroUse {
                        macro_name,
                        offset: whole.start(),
                        targets,
                    });
                }
                Argument::Unterminated => scan.warnings.push((
                    whole.start(),
                    format!("unterminated \\{} argument", macro_name),
                )),
                Argument::Missing => {
                    tracing::trace!(offset = whole.start(), macro_name = %macro_name, "Macro without argument");
                }
            }
        }
    }
}

/// `\ref` matched inside `\reference`: the control word goes on.
fn continues_macro_name(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '@')
}

/// Read the braced argument following a macro name ending at `pos`.
///
/// Accepts an optional `*` and one optional `[...]` argument before the
/// braces, with whitespace in between.
fn read_argument(text: &str, pos: usize) -> Argument {
    let bytes = text.as_bytes();
    let mut i = pos;

    if bytes.get(i) == Some(&b'*') {
        i += 1;
    }
    i = skip_inline_space(bytes, i);
    if bytes.get(i) == Some(&b'[') {
        match text[i..].find(']') {
            Some(close) => i = skip_inline_space(bytes, i + close + 1),
            None => return Argument::Unterminated,
        }
    }
    if bytes.get(i) != Some(&b'{') {
        return Argument::Missing;
    }

    read_group(text, i)
}

fn skip_inline_space(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\n' | b'\r')) {
        i += 1;
    }
    i
}

/// Read a balanced `{...}` group starting at `open`. A blank line ends the
/// search: reference arguments never span paragraphs.
fn read_group(text: &str, open: usize) -> Argument {
    let mut depth = 0usize;
    let mut escaped = false;
    let mut seen_newline = false;
    let mut line_has_content = false;

    for (i, ch) in text[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Argument::Found(text[open + 1..open + i].to_string());
                }
            }
            '\n' => {
                if seen_newline && !line_has_content {
                    return Argument::Unterminated;
                }
                seen_newline = true;
                line_has_content = false;
                continue;
            }
            c if c.is_whitespace() => continue,
            _ => {}
        }
        line_has_content = true;
    }

    Argument::Unterminated
}
