// Rust-ocilib - Rust driver for Oracle database on top of OCI
//
// URL: https://github.com/kubo/rust-ocilib
//
//-----------------------------------------------------------------------------
// Copyright (c) 2017-2023 Kubo Takehiro <kubo@jiubao.org>. All rights reserved.
// This program is free software: you can modify it and/or redistribute it
// under the terms of:
//
// (i)  the Universal Permissive License v 1.0 or at your option, any
//      later version (http://oss.oracle.com/licenses/upl); and/or
//
// (ii) the Apache License v 2.0. (http://www.apache.org/licenses/LICENSE-2.0)
//-----------------------------------------------------------------------------

use std::fmt;

/// Oracle client or server version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Version {
    major: i32,
    minor: i32,
    update: i32,
    patch: i32,
    port_update: i32,
}

impl Version {
    /// Creates a new version from the five Oracle version components.
    pub const fn new(major: i32, minor: i32, update: i32, patch: i32, port_update: i32) -> Version {
        Version {
            major,
            minor,
            update,
            patch,
            port_update,
        }
    }

    pub(crate) const fn tier(major: i32, minor: i32) -> Version {
        Version::new(major, minor, 0, 0, 0)
    }

    /// 1st part of the version
    pub fn major(&self) -> i32 {
        self.major
    }

    /// 2nd part of the version
    pub fn minor(&self) -> i32 {
        self.minor
    }

    /// 3rd part of the version
    pub fn update(&self) -> i32 {
        self.update
    }

    /// 4th part of the version
    pub fn patch(&self) -> i32 {
        self.patch
    }

    /// 5th part of the version
    pub fn port_update(&self) -> i32 {
        self.port_update
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}",
            self.major, self.minor, self.update, self.patch, self.port_update
        )
    }
}

/// One probe per version tier, newest first. The runtime version of the
/// loaded client is the tier of the newest symbol that resolves.
///
/// From Oracle 10.2 on the probe only seeds the tier; the exact five-part
/// version is then read through `OCIClientVersion`.
const VERSION_PROBES: [(&str, Version); 9] = [
    ("OCIStmtGetNextResult", Version::tier(12, 1)),
    ("OCILobGetContentType", Version::tier(11, 2)),
    ("OCIArrayDescriptorFree", Version::tier(11, 1)),
    ("OCIClientVersion", Version::tier(10, 2)),
    ("OCILobWrite2", Version::tier(10, 1)),
    ("OCIStmtPrepare2", Version::tier(9, 2)),
    ("OCIDateTimeGetTimeZoneName", Version::tier(9, 0)),
    ("OCIThreadCreate", Version::tier(8, 1)),
    ("OCIEnvCreate", Version::tier(8, 0)),
];

/// Infers the client version tier from symbol availability.
///
/// Returns `None` when not even the OCI 8.0 floor resolves, in which case the
/// opened library is not a usable Oracle client.
pub(crate) fn version_from_symbols<F>(has_symbol: F) -> Option<Version>
where
    F: Fn(&str) -> bool,
{
    VERSION_PROBES
        .iter()
        .find(|(name, _)| has_symbol(name))
        .map(|&(_, version)| version)
}

/// Feature availability derived from the runtime version and from the
/// resolution of the specific entry points each feature needs.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Features {
    pub lob_ub8: bool,
    pub scrollable_cursors: bool,
    pub statement_caching: bool,
    pub implicit_results: bool,
    pub subscriptions: bool,
    pub ha_events: bool,
    pub xa: bool,
    pub array_descriptor_alloc: bool,
    pub direct_path: bool,
}

impl Features {
    pub(crate) fn derive<F>(version: Version, has_symbol: F) -> Features
    where
        F: Fn(&str) -> bool,
    {
        Features {
            lob_ub8: version >= Version::tier(10, 1) && has_symbol("OCILobCopy2"),
            scrollable_cursors: version >= Version::tier(9, 0) && has_symbol("OCIStmtFetch2"),
            statement_caching: version >= Version::tier(9, 2) && has_symbol("OCIStmtPrepare2"),
            implicit_results: version >= Version::tier(12, 1) && has_symbol("OCIStmtGetNextResult"),
            subscriptions: version >= Version::tier(10, 2) && has_symbol("OCISubscriptionRegister"),
            ha_events: version >= Version::tier(10, 2),
            xa: version >= Version::tier(8, 1),
            array_descriptor_alloc: has_symbol("OCIArrayDescriptorAlloc"),
            direct_path: version >= Version::tier(8, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn symbols(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn newest_symbol_wins() {
        let syms = symbols(&[
            "OCIEnvCreate",
            "OCIStmtPrepare2",
            "OCILobWrite2",
            "OCIClientVersion",
            "OCIArrayDescriptorFree",
            "OCILobGetContentType",
            "OCIStmtGetNextResult",
        ]);
        let ver = version_from_symbols(|n| syms.contains(n)).unwrap();
        assert_eq!(ver, Version::tier(12, 1));
    }

    #[test]
    fn waterfall_steps_down() {
        let syms = symbols(&[
            "OCIEnvCreate",
            "OCIStmtPrepare2",
            "OCIDateTimeGetTimeZoneName",
        ]);
        let ver = version_from_symbols(|n| syms.contains(n)).unwrap();
        assert_eq!(ver, Version::tier(9, 2));

        let syms = symbols(&["OCIEnvCreate", "OCIThreadCreate"]);
        let ver = version_from_symbols(|n| syms.contains(n)).unwrap();
        assert_eq!(ver, Version::tier(8, 1));
    }

    #[test]
    fn non_oracle_library_is_rejected() {
        assert!(version_from_symbols(|_| false).is_none());
    }

    #[test]
    fn feature_gate_needs_version_and_symbol() {
        // an 11.1 client resolves OCILobCopy2
        let syms = symbols(&["OCILobCopy2", "OCIStmtFetch2", "OCIStmtPrepare2"]);
        let feats = Features::derive(Version::tier(11, 1), |n| syms.contains(n));
        assert!(feats.lob_ub8);
        assert!(feats.scrollable_cursors);
        assert!(feats.statement_caching);
        assert!(!feats.implicit_results);

        // a 9.2 client misses the 64-bit LOB API even though scrollable works
        let feats = Features::derive(Version::tier(9, 2), |n| syms.contains(n));
        assert!(!feats.lob_ub8);
        assert!(feats.scrollable_cursors);
    }

    #[test]
    fn version_ordering_and_display() {
        assert!(Version::new(12, 1, 0, 2, 0) > Version::tier(12, 1));
        assert!(Version::tier(11, 2) < Version::tier(12, 1));
        assert_eq!(Version::new(19, 3, 0, 0, 0).to_string(), "19.3.0.0.0");
    }
}
