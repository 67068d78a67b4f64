//! Filler-word cleanup for speaker-labelled markdown transcripts
//!
//! Runs on the aligned markdown (`**Speaker 1:** text` lines), never on SRT
//! input. Only standalone filler tokens are removed; spacing and sentence
//! capitalisation are repaired afterwards.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// um, umm, uh, uhh, erm, ermm, er
const FILLER: &str = r"(?:um+|uh+|erm+|er)";

fn filler_regex(template: &str) -> Regex {
    let pattern = format!("(?i){}", template.replace("{F}", FILLER));
    Regex::new(&pattern).expect("filler pattern is valid")
}

fn fixed_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("cleanup pattern is valid")
}

static PARENS_ONLY: LazyLock<Regex> = LazyLock::new(|| filler_regex(r"\(\s*{F}\s*\)"));
static FILLER_COMMA: LazyLock<Regex> = LazyLock::new(|| filler_regex(r"\b{F}\b\s*,\s*"));
static FILLER_SPACED: LazyLock<Regex> = LazyLock::new(|| filler_regex(r"\s+\b{F}\b\s+"));
static FILLER_START: LazyLock<Regex> = LazyLock::new(|| filler_regex(r"^\s*\b{F}\b\s+"));
static FILLER_END: LazyLock<Regex> = LazyLock::new(|| filler_regex(r"\s+\b{F}\b\s*$"));
static FILLER_STANDALONE: LazyLock<Regex> = LazyLock::new(|| filler_regex(r"\b{F}\b"));

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"[ \t]{2,}"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"\s+([,.;:!?])"));
static NO_SPACE_AFTER_PUNCT: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"([,.;:!?])(\S)"));
static DASH: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"\s*[—–]\s*"));
static SPACED_HYPHEN: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"\s+-\s+"));
static MULTI_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"\s{2,}"));

static FIRST_LETTER: LazyLock<Regex> =
    LazyLock::new(|| fixed_regex(r#"^(?P<prefix>[\s"'“”‘’(\[{]*)(?P<ch>[a-z])"#));
static SENTENCE_START: LazyLock<Regex> = LazyLock::new(|| {
    fixed_regex(r#"(?P<boundary>[.!?])(?P<prefix>[\s"'“”‘’)\]}]*[\s"'“”‘’(\[{]*)?(?P<ch>[a-z])"#)
});
static LONE_I: LazyLock<Regex> = LazyLock::new(|| fixed_regex(r"\bi\b"));

/// `**Label:** utterance`
static SPEAKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| fixed_regex(r"^(\*\*[^\n]*?:\*\*)\s*(.*)$"));

/// Remove filler words from one utterance and tidy the result
///
/// An utterance made only of fillers comes back empty.
pub fn cleanup_utterance(text: &str) -> String {
    let text = PARENS_ONLY.replace_all(text, "");
    let text = FILLER_COMMA.replace_all(&text, "");
    let text = FILLER_SPACED.replace_all(&text, " ");
    let text = FILLER_START.replace_all(&text, "");
    let text = FILLER_END.replace_all(&text, "");
    let text = FILLER_STANDALONE.replace_all(&text, "");

    let text = fix_spacing(&text);
    capitalise_sentence_starts(&text)
}

/// Clean every speaker line of a markdown transcript
///
/// Lines that are not `**Label:** utterance` are passed through untouched.
/// The output always ends with exactly one newline.
pub fn cleanup_markdown(markdown: &str) -> String {
    let lines: Vec<String> = markdown
        .lines()
        .map(|line| match SPEAKER_LINE.captures(line) {
            Some(caps) => {
                let speaker = caps.get(1).map_or("", |m| m.as_str());
                let utterance = caps.get(2).map_or("", |m| m.as_str());
                let cleaned = cleanup_utterance(utterance);
                if cleaned.is_empty() {
                    speaker.to_string()
                } else {
                    format!("{} {}", speaker, cleaned)
                }
            }
            None => line.to_string(),
        })
        .collect();

    let mut output = lines.join("\n").trim_end().to_string();
    output.push('\n');
    output
}

/// Where the untouched transcript is kept: `name.raw.md` next to `name.md`
pub fn backup_path(path: &Path) -> PathBuf {
    let suffix = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    let new_suffix = format!("{}.raw.md", suffix.replace(".md", ""));
    let candidate = path.with_extension(new_suffix.trim_start_matches('.'));

    if candidate == path {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".raw");
        PathBuf::from(raw)
    } else {
        candidate
    }
}

fn fix_spacing(text: &str) -> String {
    let text = MULTI_SPACE.replace_all(text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "${1}");
    let text = NO_SPACE_AFTER_PUNCT.replace_all(&text, "${1} ${2}");
    let text = DASH.replace_all(&text, " — ");
    let text = SPACED_HYPHEN.replace_all(&text, " — ");
    let text = MULTI_WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

fn capitalise_sentence_starts(text: &str) -> String {
    let text = FIRST_LETTER.replace(text, |caps: &Captures<'_>| {
        format!("{}{}", group(caps, "prefix"), group(caps, "ch").to_ascii_uppercase())
    });
    let text = SENTENCE_START.replace_all(&text, |caps: &Captures<'_>| {
        format!(
            "{}{}{}",
            group(caps, "boundary"),
            group(caps, "prefix"),
            group(caps, "ch").to_ascii_uppercase()
        )
    });
    LONE_I.replace_all(&text, "I").into_owned()
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}
