//! Title normalization applied before hashing and classification.
//!
//! Two differently-formatted renderings of the same headline must produce
//! the same string, and therefore the same fingerprint: outlet boilerplate
//! is stripped, typographic quotes folded, whitespace collapsed, and
//! spelled-out preposition+article sequences folded into their contracted
//! surface forms ("de o" → "do"). `normalize` is idempotent.

use std::sync::LazyLock;

use regex::Regex;

/// Literal outlet decorations stripped wherever they occur. Prefix and
/// suffix markers from every feed the crawl covers; removal of a literal
/// is idempotent.
const BOILERPLATE: &[&str] = &[
    " | Rui Moreira | PÚBLICO",
    " - Weekend - Jornal de Negócios",
    " - Politica - DN",
    " - Sábado",
    " > Sociedade",
    " | DNOTICIAS.PT",
    " | Expresso.pt",
    " - Visao.pt",
    " - Notícias Lusa - SAPO Notícias",
    "Presidenciais - ",
    "Política - ",
    " - TV & Media - DN",
    " - Lusa - SAPO Notícias",
    "Visão | ",
    "Expresso | ",
    "SIC Notícias | ",
    "- Política - PUBLICO.PT",
    "- PUBLICO.PT",
    "- RTP Noticias, Áudio",
    "> Política vídeos",
    " – Observador",
    " - Observador",
    " – Obser",
    " - RTP Noticias",
    " - Renascença",
    " - Expresso.pt",
    " - JN",
    " | TVI24",
    " > TVI24",
    " > Política",
    "VIDEO - ",
    " > Geral",
    " > TV",
    " - Vídeos",
    " (C/ VIDEO)",
    " - Opinião - DN",
    "DNOTICIAS.PT",
    " - Lusa - SA",
    " | Económico",
    " - Sol",
    " | Diário Económico.com",
    " - PÚBLICO",
    " – O Jornal Económico",
    "DN Online: ",
    " - dn - DN",
    " - Portugal - DN",
    " - Galerias - DN",
    "- ZAP",
    "- Política",
    "- Sociedade",
    " – Página 2",
    "- Notícias",
    " - TSF",
    " - AEIOU.pt",
];

/// Preposition+article sequences folded into their contracted forms.
/// Applied in order, one forward pass; patterns match only when bounded by
/// spaces, so string-initial capitalized forms are left alone. No rule's
/// output re-creates an earlier rule's pattern, so a single pass is a
/// fixpoint.
const CONTRACTIONS: &[(&str, &str)] = &[
    // em + article
    (" em o ", " no "),
    (" em a ", " na "),
    (" em os ", " nos "),
    (" em as ", " nas "),
    (" em um ", " num "),
    (" em uma ", " numa "),
    (" em uns ", " nuns "),
    (" em umas ", " numas "),
    // de + article
    (" de o ", " do "),
    (" de a ", " da "),
    (" de os ", " dos "),
    (" de as ", " das "),
    (" de um ", " dum "),
    (" de uma ", " duma "),
    (" de uns ", " duns "),
    (" de umas ", " dumas "),
    // de + demonstrative
    (" de este ", " deste "),
    (" de esta ", " desta "),
    (" de estes ", " destes "),
    (" de estas ", " destas "),
    (" de esse ", " desse "),
    (" de essa ", " dessa "),
    (" de esses ", " desses "),
    (" de essas ", " dessas "),
    // por + article
    (" por o ", " pelo "),
    (" por a ", " pela "),
    (" por os ", " pelos "),
    (" por as ", " pelas "),
    // a + article
    (" a o ", " ao "),
    (" a a ", " à "),
    (" a os ", " aos "),
    (" a as ", " às "),
];

static CURLY_QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new("[“”″']").unwrap());
static DOUBLED_QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new("\"{2,}").unwrap());

/// Normalize a crawled title for fingerprinting and classification.
///
/// Whitespace is collapsed both before boilerplate matching (the markers
/// are single-spaced) and after removal (removal can leave a double
/// space behind); without the second collapse a repeated application
/// could strip further, and `normalize` must be a fixpoint after one
/// call.
pub fn normalize(title: &str) -> String {
    let mut text = collapse_whitespace(title);
    for marker in BOILERPLATE {
        if text.contains(marker) {
            text = text.replace(marker, "");
        }
    }

    let text = CURLY_QUOTES.replace_all(&text, "\"");
    let text = DOUBLED_QUOTES.replace_all(&text, "\"");
    let mut text = collapse_whitespace(&text);

    for (pattern, folded) in CONTRACTIONS {
        if text.contains(pattern) {
            text = text.replace(pattern, folded);
        }
    }

    text
}

/// Single-space every whitespace run and drop the zero-width spaces some
/// feeds embed, which count as non-tokens.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace()
        .map(|t| t.trim_matches('\u{200b}'))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-delimited token count of a normalized title. Titles with
/// two tokens or fewer cannot carry a two-entity relationship and are
/// skipped upstream.
pub fn token_count(title: &str) -> usize {
    title.split_whitespace().count()
}
