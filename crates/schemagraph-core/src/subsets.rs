//! Fixed-size subset enumeration.
//!
//! Subsets are produced by an include/exclude search over the input
//! positions, include branch first, so emission order is lexicographic by
//! input position: for `[a, b, c, d]` and size 2 the order is
//! `ab ac ad bc bd cd`. The search runs on an explicit stack, which keeps the
//! iterator lazy. Branches that can no longer reach the requested size are
//! cut; this changes neither the output nor its order.

/// Iterator over every `size`-element subset of a slice.
#[derive(Debug, Clone)]
pub struct Subsets<'a, T> {
    items: &'a [T],
    size: usize,
    stack: Vec<Frame>,
}

#[derive(Debug, Clone)]
struct Frame {
    next: usize,
    picked: Vec<usize>,
}

/// Enumerate every subset of `items` with exactly `size` elements.
pub fn subsets<T>(items: &[T], size: usize) -> Subsets<'_, T> {
    Subsets {
        items,
        size,
        stack: vec![Frame {
            next: 0,
            picked: Vec::with_capacity(size),
        }],
    }
}

/// Enumerate every unordered pair of `items`, earlier element first.
pub fn pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    subsets(items, 2).map(|pair| (pair[0], pair[1]))
}

impl<'a, T> Iterator for Subsets<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            if frame.picked.len() == self.size {
                return Some(frame.picked.iter().map(|&idx| &self.items[idx]).collect());
            }

            let remaining = self.items.len() - frame.next;
            if frame.picked.len() + remaining < self.size {
                continue;
            }

            // Exclude goes on the stack first so include is explored first.
            self.stack.push(Frame {
                next: frame.next + 1,
                picked: frame.picked.clone(),
            });
            let mut picked = frame.picked;
            picked.push(frame.next);
            self.stack.push(Frame {
                next: frame.next + 1,
                picked,
            });
        }

        None
    }
}
