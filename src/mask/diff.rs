/// What changed between two values, with positions counted in chars.
///
/// `old = prefix + removed + suffix` and `new = prefix + inserted + suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDelta {
    pub inserted: String,
    pub removed: String,
    pub prefix_len: usize,
    pub suffix_len: usize,
}

impl EditDelta {
    /// Nothing was typed or removed; only the selection moved.
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }

    pub fn inserted_len(&self) -> usize {
        self.inserted.chars().count()
    }

    pub fn removed_len(&self) -> usize {
        self.removed.chars().count()
    }
}

/// Diffs `old` against `new` by trimming the longest common prefix, then the
/// longest common suffix of what remains.
///
/// Repeated characters make the split ambiguous; the longest prefix always
/// wins, so `diff("aaa", "aaaa")` reports the insertion at position 3. Callers
/// that need the actual edit position take it from the caret.
pub fn diff(old: &str, new: &str) -> EditDelta {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    let prefix_len = old_chars
        .iter()
        .zip(new_chars.iter())
        .take_while(|(old_ch, new_ch)| old_ch == new_ch)
        .count();

    let old_rest = &old_chars[prefix_len..];
    let new_rest = &new_chars[prefix_len..];
    let suffix_len = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(old_ch, new_ch)| old_ch == new_ch)
        .count();

    EditDelta {
        inserted: new_rest[..new_rest.len() - suffix_len].iter().collect(),
        removed: old_rest[..old_rest.len() - suffix_len].iter().collect(),
        prefix_len,
        suffix_len,
    }
}
