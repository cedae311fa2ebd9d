//! # Naming
//!
//! Pure, order-independent name transforms shared by the model builder and
//! exposed to templates through [`crate::generator::HelperRegistry`].
//!
//! ## Word splitting
//!
//! Every case conversion first splits its input into words:
//!
//! - any non-alphanumeric character separates words (`order_items`, `order-items`)
//! - a lowercase letter or digit followed by an uppercase letter starts a new word (`orderItems`)
//! - an uppercase run followed by a lowercase letter ends before its last capital
//!   (`URLPath` → `URL`, `Path`), unless that letter is a lone plural `s`
//!   closing the word (`URLs` and `IDs` are one word each)
//! - digits stay attached to the word they follow (`address2` is one word)
//!
//! ## Acronyms
//!
//! Acronyms are ordinary words. `URLPath` becomes `UrlPath` in PascalCase and
//! `url_path` in snake_case, `user_ID` becomes `UserId`. This matches Rust's
//! UpperCamelCase convention and keeps every conversion idempotent. Names that
//! need a different spelling go through the table override hook in
//! [`crate::config`].
//!
//! ## Inflection
//!
//! [`pluralize`] and [`singularize`] only touch the last word of an identifier,
//! so `order_items` singularizes to `order_item` and `OrderItems` to
//! `OrderItem`. Lookup order is: uncountable words, the irregular table, then
//! the regular suffix rules (first match wins). The irregular table also lists
//! singular nouns ending in `s` that the suffix rules would damage, which is
//! what keeps `singularize` idempotent on words like `status` or `campus`.
//! Anything not covered falls through to the regular rules.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Words that are their own plural.
const UNCOUNTABLE: &[&str] = &[
    "aircraft",
    "audio",
    "chassis",
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "hardware",
    "information",
    "jeans",
    "media",
    "metadata",
    "money",
    "moose",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "staff",
];

/// Irregular `(singular, plural)` pairs, matched against the whole last word.
const IRREGULAR: &[(&str, &str)] = &[
    ("alumnus", "alumni"),
    ("atlas", "atlases"),
    ("bias", "biases"),
    ("bonus", "bonuses"),
    ("cactus", "cacti"),
    ("campus", "campuses"),
    ("canvas", "canvases"),
    ("census", "censuses"),
    ("child", "children"),
    ("chorus", "choruses"),
    ("circus", "circuses"),
    ("cookie", "cookies"),
    ("corpus", "corpora"),
    ("criterion", "criteria"),
    ("focus", "focuses"),
    ("foot", "feet"),
    ("gas", "gases"),
    ("genus", "genera"),
    ("goose", "geese"),
    ("iris", "irises"),
    ("lens", "lenses"),
    ("move", "moves"),
    ("person", "people"),
    ("radius", "radii"),
    ("sex", "sexes"),
    ("tooth", "teeth"),
    ("zombie", "zombies"),
];

fn compile(rules: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("valid inflection rule"),
                *replacement,
            )
        })
        .collect()
}

static PLURAL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile(&[
        ("(?i)(quiz)$", "${1}zes"),
        ("(?i)^(oxen)$", "${1}"),
        ("(?i)^(ox)$", "${1}en"),
        ("(?i)^(m|l)ice$", "${1}ice"),
        ("(?i)^(m|l)ouse$", "${1}ice"),
        ("(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        ("(?i)(x|ch|ss|sh)$", "${1}es"),
        ("(?i)([^aeiouy]|qu)y$", "${1}ies"),
        ("(?i)(hive)$", "${1}s"),
        ("(?i)([^f])fe$", "${1}ves"),
        ("(?i)([lr])f$", "${1}ves"),
        ("(?i)sis$", "ses"),
        ("(?i)(bacteri|curricul|memorand|strat|millenni)um$", "${1}a"),
        ("(?i)(buffal|tomat|her|potat|ech)o$", "${1}oes"),
        ("(?i)(bu)s$", "${1}ses"),
        ("(?i)(alias|status)$", "${1}es"),
        ("(?i)(octop|vir)(?:i|us)$", "${1}i"),
        ("(?i)^(ax|test)is$", "${1}es"),
        ("(?i)s$", "s"),
        ("$", "s"),
    ])
});

static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile(&[
        ("(?i)(database)s$", "${1}"),
        ("(?i)(quiz)zes$", "${1}"),
        ("(?i)(matri)ces$", "${1}x"),
        ("(?i)(vert|ind)ices$", "${1}ex"),
        ("(?i)^(ox)en$", "${1}"),
        ("(?i)(alias|status)(es)?$", "${1}"),
        ("(?i)(octop|vir)(us|i)s?$", "${1}us"),
        ("(?i)^(a)x[ie]s$", "${1}xis"),
        ("(?i)(cris|test)(is|es)$", "${1}is"),
        ("(?i)(shoe)s$", "${1}"),
        ("(?i)(o)es$", "${1}"),
        ("(?i)(bus)(es)?$", "${1}"),
        ("(?i)^(m|l)ices?$", "${1}ouse"),
        ("(?i)(x|ch|ss|sh)es$", "${1}"),
        ("(?i)(m)ovies$", "${1}ovie"),
        ("(?i)([^aeiouy]|qu)ies$", "${1}y"),
        ("(?i)([lr])ves$", "${1}f"),
        ("(?i)(tive)s$", "${1}"),
        ("(?i)(hive)s$", "${1}"),
        ("(?i)([^f])ves$", "${1}fe"),
        ("(?i)(^analy)(sis|ses)$", "${1}sis"),
        (
            "(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        ("(?i)(bacteri|curricul|memorand|strat|millenni)a$", "${1}um"),
        ("(?i)(ss)$", "${1}"),
        ("(?i)s$", ""),
    ])
});

#[derive(Clone, Copy)]
enum Number {
    Singular,
    Plural,
}

/// Byte ranges of the words in `s`, per the splitting rules in the module docs.
fn word_spans(s: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (pos, &(idx, c)) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if let Some(st) = start.take() {
                spans.push(st..idx);
            }
            continue;
        }
        match start {
            None => start = Some(idx),
            Some(st) => {
                let prev = chars[pos - 1].1;
                let next_is_lower = chars.get(pos + 1).is_some_and(|&(_, n)| n.is_lowercase());
                // `URLs`: the `s` pluralizes the acronym, it does not start `Ls`
                let plural_tail = chars.get(pos + 1).is_some_and(|&(_, n)| n == 's')
                    && !chars.get(pos + 2).is_some_and(|&(_, n)| n.is_lowercase());
                let next_is_lower = next_is_lower && !plural_tail;
                let boundary = c.is_uppercase()
                    && (prev.is_lowercase()
                        || prev.is_numeric()
                        || (prev.is_uppercase() && next_is_lower));
                if boundary {
                    spans.push(st..idx);
                    start = Some(idx);
                }
            }
        }
    }
    if let Some(st) = start {
        spans.push(st..s.len());
    }
    spans
}

fn split_words(s: &str) -> Vec<&str> {
    word_spans(s).into_iter().map(|r| &s[r]).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn is_all_upper(word: &str) -> bool {
    word.chars().filter(|c| c.is_alphabetic()).count() > 1
        && word.chars().all(|c| !c.is_lowercase())
}

/// Re-apply the casing of `original` to an inflected replacement.
fn match_case(original: &str, replacement: &str) -> String {
    if is_all_upper(original) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_lowercase()
    }
}

fn inflect_word(word: &str, number: Number) -> String {
    let once = inflect_word_once(word, number);
    match number {
        // plural of a plural (`peoples`, `mices`)
        Number::Singular if once != word => inflect_word_once(&once, number),
        _ => once,
    }
}

fn inflect_word_once(word: &str, number: Number) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    for &(singular, plural) in IRREGULAR {
        let (keep, replace_with) = match number {
            Number::Singular => (singular, (plural, singular)),
            Number::Plural => (plural, (singular, plural)),
        };
        if lower == keep {
            return word.to_string();
        }
        if lower == replace_with.0 {
            return match_case(word, replace_with.1);
        }
    }
    let rules = match number {
        Number::Singular => &*SINGULAR_RULES,
        Number::Plural => &*PLURAL_RULES,
    };
    for (re, replacement) in rules {
        if re.is_match(word) {
            let inflected = re.replace(word, *replacement).into_owned();
            return if inflected.is_empty() {
                word.to_string()
            } else if is_all_upper(word) {
                inflected.to_uppercase()
            } else {
                inflected
            };
        }
    }
    word.to_string()
}

fn inflect(s: &str, number: Number) -> String {
    let Some(last) = word_spans(s).pop() else {
        return s.to_string();
    };
    format!(
        "{}{}{}",
        &s[..last.start],
        inflect_word(&s[last.clone()], number),
        &s[last.end..]
    )
}

/// Plural form of the last word of `s` (`order_item` → `order_items`).
pub fn pluralize(s: &str) -> String {
    inflect(s, Number::Plural)
}

/// Singular form of the last word of `s` (`order_items` → `order_item`).
///
/// Already-singular input is returned unchanged.
pub fn singularize(s: &str) -> String {
    inflect(s, Number::Singular)
}

/// `order_items` → `OrderItems`, `URLPath` → `UrlPath`.
///
/// Adjacent single-letter words merge the way the joined result splits again
/// (`a_b` → `Ab`), so applying the conversion twice changes nothing.
pub fn to_pascal_case(s: &str) -> String {
    let joined: String = split_words(s).into_iter().map(capitalize).collect();
    split_words(&joined).into_iter().map(capitalize).collect()
}

/// Lower camel case: `order_items` → `orderItems`, `URLPath` → `urlPath`.
pub fn to_camel_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

/// `OrderItems` → `order_items`, `URLPath` → `url_path`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Uppercase the first letter of every word, leaving the rest untouched.
///
/// Words are separated by anything that is neither alphanumeric nor `_`, so
/// `user_name` stays one word (`User_name`) while `user name` becomes `User Name`.
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_start = true;
    for c in s.chars() {
        if at_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// Lowercase only the first character: `OrderItem` → `orderItem`.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
