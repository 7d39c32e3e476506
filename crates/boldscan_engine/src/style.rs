//! Computed `font-weight` over a parsed document.
//!
//! Models the part of the CSS cascade that decides visual boldness: user-agent
//! defaults, author rules from `<style>` elements, inline `style` attributes and
//! inheritance. Author rules cascade by importance, then specificity, then source
//! order. `@media` blocks for `all` or `screen` are applied; every other `@`-rule is
//! skipped.

use std::collections::HashMap;

use boldscan_logging::scan_trace;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

pub const NORMAL_WEIGHT: u16 = 400;
pub const BOLD_WEIGHT: u16 = 700;
/// Weights at or above this are rendered bold.
pub const BOLD_THRESHOLD: u16 = 600;

const USER_AGENT_BOLD_TAGS: &[&str] = &["b", "strong", "h1", "h2", "h3", "h4", "h5", "h6", "th"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightValue {
    Absolute(u16),
    Bolder,
    Lighter,
}

impl WeightValue {
    /// Parses a `font-weight` value. Global keywords and garbage yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "normal" => Some(Self::Absolute(NORMAL_WEIGHT)),
            "bold" => Some(Self::Absolute(BOLD_WEIGHT)),
            "bolder" => Some(Self::Bolder),
            "lighter" => Some(Self::Lighter),
            other => other
                .parse::<f32>()
                .ok()
                .filter(|n| (1.0..=1000.0).contains(n))
                .map(|n| Self::Absolute(n.round() as u16)),
        }
    }

    /// Relative keywords follow the CSS Fonts level 4 mapping table.
    pub fn resolve(self, parent: u16) -> u16 {
        match self {
            Self::Absolute(weight) => weight,
            Self::Bolder => match parent {
                0..350 => 400,
                350..550 => 700,
                550..900 => 900,
                _ => parent,
            },
            Self::Lighter => match parent {
                0..100 => parent,
                100..550 => 100,
                550..750 => 400,
                _ => 700,
            },
        }
    }
}

pub fn is_bold(weight: u16) -> bool {
    weight >= BOLD_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Declaration {
    value: WeightValue,
    important: bool,
}

/// One branch of a selector list with the declaration its rule carries.
#[derive(Debug)]
struct StyleRule {
    selector: Selector,
    specificity: u32,
    declaration: Declaration,
}

/// Author rules that declare a font weight, in source order.
#[derive(Debug, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Collects every `<style>` element in the document into one sheet.
    pub fn from_document(doc: &Html) -> Self {
        let Ok(style_sel) = Selector::parse("style") else {
            return Self::default();
        };
        let css: String = doc
            .select(&style_sel)
            .map(|el| el.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse(&css)
    }

    pub fn parse(css: &str) -> Self {
        let css = strip_comments(css);
        let mut rules = Vec::new();
        collect_rules(&css, &mut rules);
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The cascaded declaration for one element, or `None` if it inherits.
    fn declared(&self, element: ElementRef<'_>) -> Option<WeightValue> {
        // ((origin precedence, specificity), value); later candidates win ties.
        let mut winner: Option<((u8, u32), WeightValue)> = None;
        let mut offer = |rank: (u8, u32), value: WeightValue| {
            if winner.is_none_or(|(current, _)| rank >= current) {
                winner = Some((rank, value));
            }
        };

        let name = element.value().name();
        if USER_AGENT_BOLD_TAGS
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(name))
        {
            offer((0, 0), WeightValue::Absolute(BOLD_WEIGHT));
        }
        for rule in &self.rules {
            if rule.selector.matches(&element) {
                let precedence = if rule.declaration.important { 3 } else { 1 };
                offer((precedence, rule.specificity), rule.declaration.value);
            }
        }
        if let Some(inline) = element
            .value()
            .attr("style")
            .and_then(font_weight_declaration)
        {
            let precedence = if inline.important { 4 } else { 2 };
            offer((precedence, 0), inline.value);
        }

        winner.map(|(_, value)| value)
    }
}

/// Memoized computed weights for the elements of one document.
#[derive(Debug)]
pub struct ComputedWeights {
    sheet: StyleSheet,
    cache: HashMap<NodeId, u16>,
}

impl ComputedWeights {
    pub fn new(doc: &Html) -> Self {
        Self::with_sheet(StyleSheet::from_document(doc))
    }

    pub fn with_sheet(sheet: StyleSheet) -> Self {
        Self {
            sheet,
            cache: HashMap::new(),
        }
    }

    pub fn weight(&mut self, element: ElementRef<'_>) -> u16 {
        if let Some(&weight) = self.cache.get(&element.id()) {
            return weight;
        }

        // Walk up to the nearest cached ancestor, then resolve top-down.
        let mut chain = vec![element];
        let mut inherited = NORMAL_WEIGHT;
        let mut cursor = element.parent();
        while let Some(node) = cursor {
            if let Some(&weight) = self.cache.get(&node.id()) {
                inherited = weight;
                break;
            }
            let Some(parent) = ElementRef::wrap(node) else {
                break;
            };
            chain.push(parent);
            cursor = node.parent();
        }

        for el in chain.into_iter().rev() {
            if let Some(value) = self.sheet.declared(el) {
                inherited = value.resolve(inherited);
            }
            self.cache.insert(el.id(), inherited);
        }
        inherited
    }

    pub fn is_bold(&mut self, element: ElementRef<'_>) -> bool {
        is_bold(self.weight(element))
    }
}

fn collect_rules(css: &str, rules: &mut Vec<StyleRule>) {
    for (prelude, block) in split_rules(css) {
        if let Some(query) = strip_at_keyword(prelude, "@media") {
            if media_applies(query) {
                collect_rules(block, rules);
            }
            continue;
        }
        if prelude.starts_with('@') {
            continue;
        }
        let Some(declaration) = font_weight_declaration(block) else {
            continue;
        };
        // Each branch of a list cascades with its own specificity.
        for branch in selector_branches(prelude) {
            match Selector::parse(branch) {
                Ok(selector) => {
                    let specificity = selector
                        .selectors
                        .iter()
                        .map(|complex| complex.specificity())
                        .max()
                        .unwrap_or_default();
                    rules.push(StyleRule {
                        selector,
                        specificity,
                        declaration,
                    });
                }
                Err(err) => scan_trace!("skipping selector {branch:?}: {err:?}"),
            }
        }
    }
}

fn strip_at_keyword<'a>(prelude: &'a str, keyword: &str) -> Option<&'a str> {
    let head = prelude.get(..keyword.len())?;
    let rest = &prelude[keyword.len()..];
    let boundary = rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '(');
    (head.eq_ignore_ascii_case(keyword) && boundary).then(|| rest.trim())
}

/// True for queries a desktop screen always satisfies: none, `all` or `screen`.
fn media_applies(query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    query.split(',').any(|medium| {
        let medium = medium.trim().to_ascii_lowercase();
        let medium = medium.strip_prefix("only ").unwrap_or(&medium).trim();
        matches!(medium, "all" | "screen")
    })
}

/// Splits a selector list on top-level commas.
fn selector_branches(prelude: &str) -> Vec<&str> {
    let mut branches = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in prelude.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                branches.push(prelude[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    branches.push(prelude[start..].trim());
    branches.retain(|branch| !branch.is_empty());
    branches
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Splits top-level `prelude { block }` pairs, keeping nested blocks inside their parent.
fn split_rules(css: &str) -> Vec<(&str, &str)> {
    let mut rules = Vec::new();
    let mut rest = css;
    while let Some(open) = rest.find('{') {
        let mut prelude = rest[..open].trim();
        // Block-less statements such as `@import url(x);` end up in front of the prelude.
        if let Some(semi) = prelude.rfind(';') {
            prelude = prelude[semi + 1..].trim();
        }

        let mut depth = 0usize;
        let mut close = None;
        for (offset, ch) in rest[open..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + offset);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            break;
        };
        rules.push((prelude, &rest[open + 1..close]));
        rest = &rest[close + 1..];
    }
    rules
}

/// Finds the effective font weight in a declaration block, honoring the `font` shorthand.
fn font_weight_declaration(block: &str) -> Option<Declaration> {
    let mut found = None;
    for decl in block.split(';') {
        let Some((property, value)) = decl.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let (value, important) = split_important(value);
        let parsed = match property.as_str() {
            "font-weight" => WeightValue::parse(value),
            "font" => shorthand_weight(value),
            _ => continue,
        };
        if let Some(value) = parsed {
            let declaration = Declaration { value, important };
            // An !important declaration is not overridden by a later normal one.
            if found.is_none_or(|prev: Declaration| important || !prev.important) {
                found = Some(declaration);
            }
        }
    }
    found
}

fn split_important(value: &str) -> (&str, bool) {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) if lower[idx..].trim() == "!important" => (trimmed[..idx].trim(), true),
        _ => (trimmed, false),
    }
}

fn shorthand_weight(value: &str) -> Option<WeightValue> {
    let lower = value.trim().to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        "inherit" | "initial" | "unset" | "revert" | "revert-layer"
    ) {
        return None;
    }
    // The shorthand resets weight to normal when it does not name one.
    let weight = lower
        .split_whitespace()
        .take_while(|token| !token.contains('/') && !token.ends_with("px"))
        .find_map(|token| match token {
            "normal" => None,
            other => WeightValue::parse(other),
        })
        .unwrap_or(WeightValue::Absolute(NORMAL_WEIGHT));
    Some(weight)
}
