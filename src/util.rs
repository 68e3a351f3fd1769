// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::collections::BTreeMap;

use enquote::unquote;

/// Splits an already-normalized argument line into shell words, honoring
/// double and single quotes. Quote characters are preserved in the output
/// words; `\X` sequences outside single quotes keep both characters.
pub(crate) fn split_words(s: &str) -> Vec<String> {
  let chars: Vec<char> = s.trim().chars().collect();
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_double = false;
  let mut in_single = false;

  let mut i = 0;
  while i < chars.len() {
    let ch = chars[i];

    if ch == '\\' && i + 1 < chars.len() && !in_single {
      current.push(ch);
      current.push(chars[i + 1]);
      i += 2;
      continue;
    }

    if ch == '"' && !in_single {
      in_double = !in_double;
      current.push(ch);
      i += 1;
      continue;
    }

    if ch == '\'' && !in_double {
      in_single = !in_single;
      current.push(ch);
      i += 1;
      continue;
    }

    if (ch == ' ' || ch == '\t') && !in_double && !in_single {
      if !current.is_empty() {
        words.push(std::mem::take(&mut current));
      }

      i += 1;
      continue;
    }

    current.push(ch);
    i += 1;
  }

  if !current.is_empty() {
    words.push(current);
  }

  words
}

/// True if the trimmed argument is a JSON-array exec form, e.g.
/// `["echo", "hello"]`.
pub(crate) fn is_exec_form(s: &str) -> bool {
  let s = s.trim();
  s.starts_with('[') && s.ends_with(']')
}

/// Parses a JSON-array exec form into its elements.
///
/// Malformed JSON downgrades to a best-effort comma split rather than an
/// error, so analysis can continue past sloppy input.
pub(crate) fn parse_exec_form(s: &str) -> Vec<String> {
  let s = s.trim();

  if let Ok(elements) = serde_json::from_str::<Vec<String>>(s) {
    return elements;
  }

  s.trim_start_matches('[')
    .trim_end_matches(']')
    .split(',')
    .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
    .filter(|part| !part.is_empty())
    .collect()
}

/// Strips surrounding quotes from a value, interpreting escapes when the
/// quoting is well-formed.
pub(crate) fn unquote_value(s: &str) -> String {
  unquote(s).unwrap_or_else(|_| {
    s.trim_matches(|c| c == '"' || c == '\'').to_string()
  })
}

/// Parses `key=value` pairs from an argument line into a sorted map.
/// Values (and quoted keys) are unquoted; words without `=` are skipped.
pub(crate) fn parse_key_value_pairs(s: &str) -> BTreeMap<String, String> {
  let mut pairs = BTreeMap::new();

  for word in split_words(s) {
    if let Some(eq) = word.find('=') {
      let key = unquote_value(word[..eq].trim());
      let value = unquote_value(word[eq + 1..].trim());
      pairs.insert(key, value);
    }
  }

  pairs
}
