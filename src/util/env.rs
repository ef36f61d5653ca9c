//! `NAME=VALUE` environment list helpers.

use std::collections::BTreeMap;

/// Environment variables keyed by name, iterated in sorted order.
pub type EnvMap = BTreeMap<String, String>;

/// Split `NAME=VALUE` lines into a map. Lines without `=` are ignored and
/// both sides are trimmed.
pub fn split<S: AsRef<str>>(lines: &[S]) -> EnvMap {
    lines
        .iter()
        .filter_map(|line| {
            let (key, value) = line.as_ref().split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Join a map into a sorted list of `NAME=VALUE` lines.
pub fn join(env: &EnvMap) -> Vec<String> {
    let mut lines: Vec<String> = env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    lines.sort();
    lines
}

/// Merge two maps, `b` overriding `a`.
///
/// Windows variable names are case-insensitive, so keys are upper-cased there.
pub fn merge(a: &EnvMap, b: &EnvMap) -> EnvMap {
    let key = |k: &String| {
        if cfg!(windows) {
            k.to_uppercase()
        } else {
            k.clone()
        }
    };

    a.iter()
        .chain(b.iter())
        .map(|(k, v)| (key(k), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_and_skips() {
        let env = split(&["CC = gcc", "no-equals", "CFLAGS=-O2 -g", "EMPTY="]);
        assert_eq!(env.len(), 3);
        assert_eq!(env["CC"], "gcc");
        assert_eq!(env["CFLAGS"], "-O2 -g");
        assert_eq!(env["EMPTY"], "");
    }

    #[test]
    fn test_split_keeps_equals_in_value() {
        let env = split(&["CL=/DFOO=1"]);
        assert_eq!(env["CL"], "/DFOO=1");
    }

    #[test]
    fn test_join_is_sorted() {
        let env = split(&["PATH=/bin", "CC=gcc", "INCLUDE=/usr/include"]);
        assert_eq!(join(&env), vec!["CC=gcc", "INCLUDE=/usr/include", "PATH=/bin"]);
    }

    #[test]
    fn test_merge_overrides() {
        let a = split(&["CC=gcc", "AR=ar"]);
        let b = split(&["CC=clang"]);
        let merged = merge(&a, &b);
        assert_eq!(merged["CC"], "clang");
        assert_eq!(merged["AR"], "ar");
    }
}
