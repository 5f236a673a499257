//! Leapfrog intersection of sorted lists
//!
//! Each list keeps a cursor. The current candidate is the largest value seen
//! so far; every list in turn seeks forward to the first value not below the
//! candidate. When a list lands past the candidate that value becomes the new
//! candidate. Once every list agrees on one value it is emitted.

/// Values present in every list, ascending and without duplicates
///
/// Input lists do not need to be sorted. An empty slice of lists, or any
/// empty list, gives an empty result.
pub fn intersect<T: Ord + Copy>(lists: &[&[T]]) -> Vec<T> {
    let mut out = Vec::new();
    if lists.is_empty() {
        return out;
    }

    let sorted: Vec<Vec<T>> = lists
        .iter()
        .map(|list| {
            let mut values = list.to_vec();
            values.sort_unstable();
            values.dedup();
            values
        })
        .collect();

    let n = sorted.len();
    let mut cursors = vec![0usize; n];

    loop {
        let Some(&first) = sorted[0].get(cursors[0]) else {
            return out;
        };
        let mut candidate = first;
        let mut agreed = 0;
        let mut i = 0;

        while agreed < n {
            cursors[i] = seek(&sorted[i], cursors[i], candidate);
            match sorted[i].get(cursors[i]) {
                None => return out,
                Some(&value) if value == candidate => agreed += 1,
                Some(&value) => {
                    candidate = value;
                    agreed = 1;
                }
            }
            i = (i + 1) % n;
        }

        out.push(candidate);
        cursors[0] = seek(&sorted[0], cursors[0], candidate) + 1;
    }
}

/// Index of the first value at or after `from` that is not below `target`
fn seek<T: Ord>(list: &[T], from: usize, target: T) -> usize {
    from + list[from..].partition_point(|value| *value < target)
}
