// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Journal directory persistence helpers:
/// entry json conversion and safe filesystem writes.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    #[serde(default)]
    id: String,
    #[serde(default)]
    spot: String,
    #[serde(default)]
    wave_height: String,
    #[serde(default)]
    wave_summary: Option<WaveSummary>,
    #[serde(default)]
    session_at: Option<DateTime<Utc>>,
    #[serde(default)]
    comments: String,
    #[serde(default)]
    created_at: String,
}

fn entry_from_json(json: EntryJson, path: &Path) -> Result<Entry, StoreError> {
    let id = EntryId::new(json.id).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("bad entry id: {source}"),
    })?;

    let mut entry = Entry::new(json.spot);
    entry.set_id(Some(id));
    entry.set_wave_height(json.wave_height);
    entry.set_conditions(json.wave_summary);
    entry.set_session_at(json.session_at);
    entry.set_comments(json.comments);
    entry.set_created_at(json.created_at);
    Ok(entry)
}

fn entry_to_json(entry: &Entry) -> EntryJson {
    EntryJson {
        id: entry
            .id()
            .map(|id| id.as_str().to_owned())
            .unwrap_or_default(),
        spot: entry.spot().to_owned(),
        wave_height: entry.wave_height().to_owned(),
        wave_summary: entry.conditions().cloned(),
        session_at: entry.session_at(),
        comments: entry.comments().to_owned(),
        created_at: entry.created_at().to_owned(),
    }
}

fn file_mtime_rfc3339(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let stamp: DateTime<Utc> = modified.into();
    Some(stamp.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".surflog.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
