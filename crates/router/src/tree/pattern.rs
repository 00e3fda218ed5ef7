use crate::error::InsertError;

/// Checks the syntax of a route pattern before it touches the trie.
pub(crate) fn validate(pattern: &str) -> Result<(), InsertError> {
    if !pattern.starts_with('/') {
        return Err(InsertError::missing_leading_slash(pattern));
    }

    let segment_count = pattern.split('/').count();
    for (index, segment) in pattern.split('/').enumerate() {
        let wildcards = segment.bytes().filter(|b| matches!(b, b':' | b'*')).count();
        if wildcards == 0 {
            continue;
        }
        if wildcards > 1 {
            return Err(InsertError::MultipleWildcards { pattern: pattern.to_owned(), segment: segment.to_owned() });
        }

        let name = match segment.find('*') {
            Some(0) if index + 1 == segment_count => &segment[1..],
            Some(0) => return Err(InsertError::CatchAllNotLast { pattern: pattern.to_owned() }),
            Some(_) => return Err(InsertError::CatchAllWithoutSlash { pattern: pattern.to_owned() }),
            None => segment.split_once(':').map_or("", |(_, name)| name),
        };

        if name.is_empty() {
            return Err(InsertError::EmptyWildcardName { pattern: pattern.to_owned() });
        }
    }

    Ok(())
}

/// Length of the literal run at the start of `bytes`.
///
/// The run ends at a `:` or at the `/` that introduces a catch-all.
pub(crate) fn literal_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b':' || (b == b'/' && bytes.get(i + 1) == Some(&b'*')))
        .map_or(bytes.len(), |(i, _)| i)
}
