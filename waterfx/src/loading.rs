/// Identifies one texture request. Tickets from an earlier activation no
/// longer match the live generation and their completions are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub generation: u64,
}

/// The caustic texture set as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSet<T> {
    Unrequested,
    Pending(LoadTicket),
    Ready(Vec<T>),
    /// Load failed; layers fall back to a flat placeholder material.
    Failed,
}

impl<T> Default for TextureSet<T> {
    fn default() -> Self {
        Self::Unrequested
    }
}

impl<T> TextureSet<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub fn ticket(&self) -> Option<LoadTicket> {
        match self {
            Self::Pending(t) => Some(*t),
            _ => None,
        }
    }

    pub fn textures(&self) -> &[T] {
        match self {
            Self::Ready(v) => v,
            _ => &[],
        }
    }

    /// Bounds-safe lookup; the index wraps around the loaded set.
    pub fn get_wrapped(&self, index: usize) -> Option<&T> {
        let v = self.textures();
        if v.is_empty() {
            None
        } else {
            v.get(index % v.len())
        }
    }

    /// Swap out the contents, leaving `Unrequested` behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
