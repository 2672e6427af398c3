use crate::core::error::CoreError;

/// Maps display positions to record indices.
///
/// `order[k]` is the record shown at visual position `k`. The underlying record array
/// is never reordered; sorting only replaces this permutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOrder {
    order: Vec<usize>,
}

impl DisplayOrder {
    #[must_use]
    pub fn identity(len: usize) -> Self {
        let mut order = Self::default();
        order.init_identity(len);
        order
    }

    /// Resets to `[0, 1, .., len - 1]`.
    ///
    /// Use this whenever the record count changes.
    pub fn init_identity(&mut self, len: usize) {
        self.order.clear();
        self.order.extend(0..len);
    }

    /// Replaces the order wholesale. Rejects anything that is not a permutation of the
    /// current length.
    pub fn apply_permutation(&mut self, permutation: Vec<usize>) -> Result<(), CoreError> {
        if !is_permutation(&permutation, self.order.len()) {
            return Err(CoreError::InvalidPermutation {
                expected: self.order.len(),
            });
        }
        self.order = permutation;
        Ok(())
    }

    #[must_use]
    pub fn get(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.order
            .iter()
            .enumerate()
            .all(|(position, &index)| position == index)
    }

    /// Display position of a record index.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.order.iter().position(|&candidate| candidate == index)
    }
}

/// Returns true if `candidate` holds every index in `0..len` exactly once.
#[must_use]
pub fn is_permutation(candidate: &[usize], len: usize) -> bool {
    if candidate.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in candidate {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
