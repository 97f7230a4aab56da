//! Invocation planning: pure transformations from arguments to invocation specs
//!
//! Every function here returns a new vector; the caller's arguments are never
//! modified. Filesystem access is the caller's business and only happens
//! through the `list_dir` closure given to [`resolve_file_reference`].

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use tracing::debug;

use crate::domain::entities::{
    InvocationSpec, LogWrapper, LOG_FLAG_LONG, LOG_FLAG_SHORT, SENTINEL,
};
use crate::domain::error::DomainError;
use crate::domain::ordinal::OrdinalTable;

/// Files found in the working directory, plus what was searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub dir: PathBuf,
    /// Package-file extension without the dot, e.g. `cygport`
    pub suffix: String,
    /// Plain file names, not paths
    pub files: Vec<OsString>,
}

impl DirectoryListing {
    /// Non-hidden names ending in `.<suffix>`, sorted.
    ///
    /// Hidden files are skipped the way a shell glob `*.cygport` skips them.
    /// Names are compared as bytes, so a name that is not valid UTF-8 still
    /// counts.
    pub fn candidates(&self) -> Vec<OsString> {
        let ending = format!(".{}", self.suffix);
        let ending = ending.as_bytes();
        let mut found: Vec<OsString> = self
            .files
            .iter()
            .filter(|name| {
                let bytes = name.as_encoded_bytes();
                !bytes.starts_with(b".") && bytes.len() > ending.len() && bytes.ends_with(ending)
            })
            .cloned()
            .collect();
        found.sort();
        found
    }
}

/// Raw arguments with the package-file token pinned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Raw arguments, sentinel replaced if there was one
    pub raw: Vec<OsString>,
    /// The concrete package file
    pub package_file: OsString,
    /// Position of `package_file` in `raw`
    pub index: usize,
}

/// Turn the `<cygport-file>` token into a concrete file name.
///
/// Anything other than exactly `"."` is returned as is and `list_dir` is never
/// called. For `"."` the listing must hold exactly one candidate, which then
/// replaces the sentinel at its original position.
pub fn resolve_file_reference<E, F>(
    raw: &[OsString],
    token: &OsStr,
    list_dir: F,
) -> Result<Resolution, E>
where
    F: FnOnce() -> Result<DirectoryListing, E>,
    E: From<DomainError>,
{
    if token != SENTINEL {
        let index = position_of(raw, token).ok_or_else(|| {
            DomainError::PackageFileNotInArguments(token.to_string_lossy().into_owned())
        })?;
        return Ok(Resolution {
            raw: raw.to_vec(),
            package_file: token.to_os_string(),
            index,
        });
    }

    let count = raw.iter().skip(1).filter(|t| *t == SENTINEL).count();
    if count > 1 {
        return Err(DomainError::SentinelRepeated { count }.into());
    }
    let index = position_of(raw, OsStr::new(SENTINEL))
        .ok_or_else(|| DomainError::PackageFileNotInArguments(SENTINEL.to_string()))?;

    let listing = list_dir()?;
    let mut candidates = listing.candidates();
    debug!(
        "resolve_file_reference: dir={}, candidates={:?}",
        listing.dir.display(),
        candidates
    );
    let package_file = match candidates.len() {
        0 => {
            return Err(DomainError::NoCandidate {
                dir: listing.dir,
                suffix: listing.suffix,
            }
            .into())
        }
        1 => candidates.remove(0),
        _ => {
            return Err(DomainError::NotUnique {
                dir: listing.dir,
                candidates: candidates
                    .iter()
                    .map(|c| c.to_string_lossy().into_owned())
                    .collect(),
            }
            .into())
        }
    };

    let mut resolved = raw.to_vec();
    resolved[index] = package_file.clone();
    Ok(Resolution {
        raw: resolved,
        package_file,
        index,
    })
}

/// First position of `token` after the program slot.
fn position_of(raw: &[OsString], token: &OsStr) -> Option<usize> {
    raw.iter()
        .enumerate()
        .skip(1)
        .find(|(_, t)| t.as_os_str() == token)
        .map(|(i, _)| i)
}

/// Replace every `alias` with `expansion`, in place of the alias.
///
/// Order of everything else is kept and each occurrence expands on its own.
pub fn expand_alias(commands: &[OsString], alias: &str, expansion: &[&str]) -> Vec<OsString> {
    commands
        .iter()
        .flat_map(|command| {
            if command == alias {
                expansion.iter().map(OsString::from).collect::<Vec<_>>()
            } else {
                vec![command.clone()]
            }
        })
        .collect()
}

/// Arguments common to every step: delegate, options, package file.
///
/// Slot 0 becomes `delegate`. When `log` is set the logging flag is dropped,
/// whether spelled `--log`, `-l`, or folded into a cluster like `-l8`.
pub fn build_invocation_prefix(
    raw: &[OsString],
    package_index: usize,
    log: bool,
    delegate: &str,
) -> Vec<OsString> {
    let mut prefix = Vec::with_capacity(package_index + 1);
    prefix.push(OsString::from(delegate));

    let options = raw.get(1..package_index).unwrap_or_default();
    for token in options {
        if !log {
            prefix.push(token.clone());
        } else if let Some(kept) = strip_log_flag(token) {
            prefix.push(kept);
        }
    }

    if let Some(package_file) = raw.get(package_index) {
        prefix.push(package_file.clone());
    }
    prefix
}

/// `None` when the whole token was the logging flag.
///
/// Tokens that are not valid UTF-8 cannot be flags and are kept as is.
fn strip_log_flag(token: &OsStr) -> Option<OsString> {
    let Some(text) = token.to_str() else {
        return Some(token.to_os_string());
    };
    if text == LOG_FLAG_LONG {
        return None;
    }
    if text.starts_with("--") || !text.starts_with('-') {
        return Some(token.to_os_string());
    }
    let rest: String = text[1..].chars().filter(|c| *c != LOG_FLAG_SHORT).collect();
    if rest.is_empty() {
        None
    } else {
        Some(OsString::from(format!("-{rest}")))
    }
}

/// One spec per command, in order.
///
/// With a wrapper each spec is
/// `[program, timestamp_flag, log_file_flag, <log_dir>/<ordinal>.<command>] + prefix + [command]`,
/// otherwise `prefix + [command]`.
pub fn build_invocation_specs(
    prefix: &[OsString],
    commands: &[OsString],
    wrapper: Option<&LogWrapper>,
    ordinals: &OrdinalTable,
) -> Vec<InvocationSpec> {
    commands
        .iter()
        .map(|command| {
            let mut argv = Vec::with_capacity(prefix.len() + 5);
            if let Some(w) = wrapper {
                let ordinal = ordinals.lookup(command.to_str().unwrap_or_default());
                argv.push(OsString::from(&w.program));
                argv.push(OsString::from(&w.timestamp_flag));
                argv.push(OsString::from(&w.log_file_flag));
                argv.push(w.log_file(ordinal, command));
            }
            argv.extend(prefix.iter().cloned());
            argv.push(command.clone());
            InvocationSpec::new(argv)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BUILD_ALIAS, BUILD_EXPANSION};
    use rstest::rstest;
    use std::cell::Cell;

    fn strings(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    fn listing(files: &[&str]) -> DirectoryListing {
        DirectoryListing {
            dir: PathBuf::from("/work"),
            suffix: "cygport".into(),
            files: strings(files),
        }
    }

    #[test]
    fn given_concrete_token_when_resolve_then_returns_unchanged_without_listing() {
        let raw = strings(&["cygport", "-l", "foo.cygport", "prep"]);
        let listed = Cell::new(false);

        let resolution = resolve_file_reference::<DomainError, _>(&raw, OsStr::new("foo.cygport"), || {
            listed.set(true);
            Ok(listing(&[]))
        })
        .unwrap();

        assert!(!listed.get());
        assert_eq!(resolution.raw, raw);
        assert_eq!(resolution.package_file, "foo.cygport");
        assert_eq!(resolution.index, 2);
    }

    #[test]
    fn given_sentinel_and_one_candidate_when_resolve_then_substitutes_in_place() {
        let raw = strings(&["cygport", "--64", ".", "prep"]);

        let resolution =
            resolve_file_reference::<DomainError, _>(&raw, OsStr::new("."), || Ok(listing(&["foo-1.0-1.cygport", "README"])))
                .unwrap();

        assert_eq!(
            resolution.raw,
            strings(&["cygport", "--64", "foo-1.0-1.cygport", "prep"])
        );
        assert_eq!(resolution.package_file, "foo-1.0-1.cygport");
        assert_eq!(resolution.index, 2);
        // input untouched
        assert_eq!(raw[2], ".");
    }

    #[test]
    fn given_sentinel_and_no_candidate_when_resolve_then_no_candidate_error() {
        let raw = strings(&["cygport", ".", "prep"]);

        let err = resolve_file_reference::<DomainError, _>(&raw, OsStr::new("."), || Ok(listing(&["notes.txt"])))
            .unwrap_err();

        assert!(matches!(err, DomainError::NoCandidate { .. }));
        assert!(err.to_string().contains("no candidate found"));
        assert!(err.is_resolution());
    }

    #[test]
    fn given_sentinel_and_two_candidates_when_resolve_then_not_unique_error() {
        let raw = strings(&["cygport", ".", "prep"]);

        let err = resolve_file_reference::<DomainError, _>(&raw, OsStr::new("."), || {
            Ok(listing(&["b.cygport", "a.cygport"]))
        })
        .unwrap_err();

        match &err {
            DomainError::NotUnique { candidates, .. } => {
                assert_eq!(candidates, &["a.cygport", "b.cygport"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("candidate not unique"));
    }

    #[test]
    fn given_repeated_sentinel_when_resolve_then_rejected_before_listing() {
        let raw = strings(&["cygport", ".", "prep", "."]);
        let listed = Cell::new(false);

        let err = resolve_file_reference::<DomainError, _>(&raw, OsStr::new("."), || {
            listed.set(true);
            Ok(listing(&["foo.cygport"]))
        })
        .unwrap_err();

        assert!(matches!(err, DomainError::SentinelRepeated { count: 2 }));
        assert!(!listed.get());
    }

    #[test]
    fn given_hidden_and_bare_suffix_files_when_candidates_then_skipped() {
        let l = listing(&[".hidden.cygport", ".cygport", "x.cygport.bak", "real.cygport"]);
        assert_eq!(l.candidates(), strings(&["real.cygport"]));
    }

    #[rstest]
    #[case(&["a", "build", "b"], &["a", "prep", "compile", "test", "b"])]
    #[case(&["build", "x", "build"], &["prep", "compile", "test", "x", "prep", "compile", "test"])]
    #[case(&["build"], &["prep", "compile", "test"])]
    #[case(&["install", "package"], &["install", "package"])]
    #[case(&[], &[])]
    #[case(&["prep", "prep"], &["prep", "prep"])]
    fn given_commands_when_expand_alias_then_build_is_replaced_in_position(
        #[case] input: &[&str],
        #[case] expected: &[&str],
    ) {
        let expanded = expand_alias(&strings(input), BUILD_ALIAS, &BUILD_EXPANSION);
        assert_eq!(expanded, strings(expected));
        assert!(!expanded.iter().any(|c| c == BUILD_ALIAS));
    }

    #[rstest]
    #[case(&["cygport", "--log", "foo.cygport"], 2, &["/usr/bin/cygport", "foo.cygport"])]
    #[case(&["cygport", "-l", "--64", "foo.cygport"], 3, &["/usr/bin/cygport", "--64", "foo.cygport"])]
    #[case(&["cygport", "--debug", "-l8", "foo.cygport"], 3, &["/usr/bin/cygport", "--debug", "-8", "foo.cygport"])]
    fn given_log_flag_when_build_prefix_then_flag_is_stripped(
        #[case] raw: &[&str],
        #[case] index: usize,
        #[case] expected: &[&str],
    ) {
        let prefix = build_invocation_prefix(&strings(raw), index, true, "/usr/bin/cygport");
        assert_eq!(prefix, strings(expected));
    }

    #[test]
    fn given_no_log_when_build_prefix_then_options_pass_through() {
        let raw = strings(&["cygport", "--32", "--debug", "foo.cygport", "prep", "compile"]);
        let prefix = build_invocation_prefix(&raw, 3, false, "/opt/cygport");
        assert_eq!(prefix, strings(&["/opt/cygport", "--32", "--debug", "foo.cygport"]));
    }

    #[test]
    fn given_no_wrapper_when_build_specs_then_prefix_plus_command() {
        let prefix = strings(&["/usr/bin/cygport", "foo.cygport"]);
        let commands = strings(&["prep", "compile"]);

        let specs = build_invocation_specs(&prefix, &commands, None, &OrdinalTable::standard());

        let argvs: Vec<_> = specs.iter().map(|s| s.argv().to_vec()).collect();
        assert_eq!(
            argvs,
            vec![
                strings(&["/usr/bin/cygport", "foo.cygport", "prep"]),
                strings(&["/usr/bin/cygport", "foo.cygport", "compile"]),
            ]
        );
    }

    #[test]
    fn given_wrapper_when_build_specs_then_wrapped_with_ordinal_log_file() {
        let prefix = strings(&["/usr/bin/cygport", "foo.cygport"]);
        let commands = strings(&["prep", "package-test", "mystery"]);
        let wrapper = LogWrapper {
            program: "logts".into(),
            timestamp_flag: "-t".into(),
            log_file_flag: "-b".into(),
            log_dir: "log".into(),
        };

        let specs =
            build_invocation_specs(&prefix, &commands, Some(&wrapper), &OrdinalTable::standard());

        assert_eq!(
            specs[0].argv(),
            strings(&["logts", "-t", "-b", "log/1.prep", "/usr/bin/cygport", "foo.cygport", "prep"])
        );
        assert_eq!(specs[1].argv()[3], "log/7.package-test");
        assert_eq!(specs[2].argv()[3], "log/95.mystery");
        assert_eq!(specs[2].command(), "mystery");
    }

    #[cfg(unix)]
    #[test]
    fn given_non_utf8_tokens_when_planning_then_bytes_are_forwarded_unchanged() {
        use std::os::unix::ffi::OsStringExt;

        let odd_file = OsString::from_vec(b"caf\xe9-1.0-1.cygport".to_vec());
        let odd_command = OsString::from_vec(b"pr\xe9p".to_vec());
        let odd_option = OsString::from_vec(b"--x\xff".to_vec());
        let mut files = strings(&["README"]);
        files.push(odd_file.clone());
        let l = DirectoryListing {
            dir: PathBuf::from("/work"),
            suffix: "cygport".into(),
            files,
        };
        let raw = vec![
            OsString::from("cygport"),
            OsString::from("-l"),
            odd_option.clone(),
            OsString::from("."),
            odd_command.clone(),
        ];

        let resolution =
            resolve_file_reference::<DomainError, _>(&raw, OsStr::new("."), || Ok(l)).unwrap();
        let prefix = build_invocation_prefix(&resolution.raw, resolution.index, true, "cygport");
        let wrapper = LogWrapper {
            program: "logts".into(),
            timestamp_flag: "-t".into(),
            log_file_flag: "-b".into(),
            log_dir: "log".into(),
        };
        let specs = build_invocation_specs(
            &prefix,
            &[odd_command.clone()],
            Some(&wrapper),
            &OrdinalTable::standard(),
        );

        assert_eq!(resolution.package_file, odd_file);
        let mut log_file = OsString::from("log/95.");
        log_file.push(&odd_command);
        assert_eq!(
            specs[0].argv(),
            [
                OsString::from("logts"),
                OsString::from("-t"),
                OsString::from("-b"),
                log_file,
                OsString::from("cygport"),
                odd_option,
                odd_file,
                odd_command,
            ]
        );
    }
}
