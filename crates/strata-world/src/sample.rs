/// Where a read value came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SampleSource {
    /// Read from a loaded chunk.
    Stored,
    /// Position is above or below the world; value is the sentinel.
    OutOfWorld,
    /// Owning chunk is not loaded; value is the sentinel.
    Unloaded,
}

/// A read result tagged with its [`SampleSource`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sampled<T> {
    pub value: T,
    pub source: SampleSource,
}

impl<T> Sampled<T> {
    #[inline]
    pub fn stored(value: T) -> Self {
        Self {
            value,
            source: SampleSource::Stored,
        }
    }

    #[inline]
    pub fn out_of_world(value: T) -> Self {
        Self {
            value,
            source: SampleSource::OutOfWorld,
        }
    }

    #[inline]
    pub fn unloaded(value: T) -> Self {
        Self {
            value,
            source: SampleSource::Unloaded,
        }
    }

    #[inline]
    pub fn is_stored(&self) -> bool {
        self.source == SampleSource::Stored
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sampled<U> {
        Sampled {
            value: f(self.value),
            source: self.source,
        }
    }
}
