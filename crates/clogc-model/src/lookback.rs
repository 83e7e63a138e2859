/// Iterator adapter yielding `(previous, current)` pairs.
///
/// The first pair has `previous == None`; every later pair carries the item
/// that arrived immediately before `current`. Only one item is retained.
pub struct Lookback<I: Iterator> {
    inner: I,
    previous: Option<I::Item>,
}

impl<I: Iterator> Lookback<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            previous: None,
        }
    }
}

impl<I> Iterator for Lookback<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = (Option<I::Item>, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.inner.next()?;
        let previous = self.previous.replace(current.clone());
        Some((previous, current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub trait LookbackExt: Iterator + Sized {
    fn lookback(self) -> Lookback<Self> {
        Lookback::new(self)
    }
}

impl<I: Iterator> LookbackExt for I {}
