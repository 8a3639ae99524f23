use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Synced,
    LocalOnly,
    RemoteOnly,
    Mismatched,
}

/// Which copy a report row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Both,
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub local: Option<u64>,
    pub remote: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub name: &'a str,
    pub side: Side,
    pub size: u64,
    pub status: Status,
}

impl Record {
    pub fn status(&self) -> Status {
        match (self.local, self.remote) {
            (Some(l), Some(r)) if l == r => Status::Synced,
            (Some(_), Some(_)) => Status::Mismatched,
            (Some(_), None) => Status::LocalOnly,
            (None, _) => Status::RemoteOnly,
        }
    }

    /// One row when both copies agree, otherwise one row per copy that exists.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let status = self.status();
        let row = |side, size| Row {
            name: &self.name,
            side,
            size,
            status,
        };
        if let (Status::Synced, Some(size)) = (status, self.local) {
            return vec![row(Side::Both, size)];
        }
        let mut rows = Vec::with_capacity(2);
        if let Some(size) = self.local {
            rows.push(row(Side::Local, size));
        }
        if let Some(size) = self.remote {
            rows.push(row(Side::Remote, size));
        }
        rows
    }
}

/// Every file name found on either side, sorted by name.
pub fn reconcile(local: &BTreeMap<String, u64>, remote: &BTreeMap<String, u64>) -> Vec<Record> {
    let names: BTreeSet<&String> = local.keys().chain(remote.keys()).collect();
    names
        .into_iter()
        .map(|name| Record {
            name: name.clone(),
            local: local.get(name).copied(),
            remote: remote.get(name).copied(),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub synced: usize,
    pub local_only: usize,
    pub remote_only: usize,
    pub mismatched: usize,
}

impl Summary {
    pub fn of(records: &[Record]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            match record.status() {
                Status::Synced => summary.synced += 1,
                Status::LocalOnly => summary.local_only += 1,
                Status::RemoteOnly => summary.remote_only += 1,
                Status::Mismatched => summary.mismatched += 1,
            }
        }
        summary
    }
}
