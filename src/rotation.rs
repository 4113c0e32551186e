extern crate chrono;

use crate::arrivals;

/// Rolling two-row window over the arrival list.
///
/// The top row shows `arrivals[cursor]` and the bottom row the one after it,
/// wrapping around at the end of the list. With two or fewer arrivals
/// everything already fits, so the cursor stays at 0 and the timer is left
/// alone.
pub struct RotationScheduler {
    interval: chrono::Duration,
    cursor: usize,
    last_rotation: chrono::DateTime<chrono::Utc>,
}

impl RotationScheduler {
    pub fn new(interval: chrono::Duration, now: chrono::DateTime<chrono::Utc>) -> RotationScheduler {
        return RotationScheduler {
            interval: interval,
            cursor: 0,
            last_rotation: now,
        };
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        return self.cursor;
    }

    /// Advances the cursor if the rotation interval has passed. Returns
    /// whether it moved.
    pub fn tick(&mut self, now: chrono::DateTime<chrono::Utc>, arrivals: &[arrivals::Arrival]) -> bool {
        let len = arrivals.len();
        if len <= 2 {
            self.cursor = 0;
            return false;
        }

        // The fetcher may have swapped in a shorter list since the last tick.
        if self.cursor >= len {
            debug!("Cursor {} out of range for {} arrivals, restarting", self.cursor, len);
            self.cursor = 0;
        }

        if now - self.last_rotation <= self.interval {
            return false;
        }

        self.cursor = (self.cursor + 1) % len;
        self.last_rotation = now;
        debug!("Rotated to {}/{}", self.cursor, len);
        return true;
    }

    pub fn current_pair<'a>(&self, arrivals: &'a [arrivals::Arrival]) -> Vec<&'a arrivals::Arrival> {
        let len = arrivals.len();
        match len {
            0 => return vec![],
            1 => return vec![&arrivals[0]],
            _ => {
                let top = if self.cursor < len { self.cursor } else { 0 };
                return vec![&arrivals[top], &arrivals[(top + 1) % len]];
            },
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate chrono;

    use chrono::TimeZone;

    use super::RotationScheduler;
    use crate::arrivals::{arrival, Arrival};

    fn at(secs: i64) -> chrono::DateTime<chrono::Utc> {
        return chrono::Utc.timestamp_opt(secs, 0).unwrap();
    }

    fn scheduler() -> RotationScheduler {
        return RotationScheduler::new(chrono::Duration::seconds(4), at(0));
    }

    fn four() -> Vec<Arrival> {
        return vec![
            arrival("RD", "A", "1"),
            arrival("RD", "B", "2"),
            arrival("RD", "C", "3"),
            arrival("RD", "D", "4"),
        ];
    }

    fn destinations(pair: Vec<&Arrival>) -> Vec<String> {
        return pair.iter().map(|a| a.destination().to_string()).collect();
    }

    #[test]
    fn empty_list_has_empty_pair() {
        let mut s = scheduler();
        assert!(!s.tick(at(100), &[]));
        assert!(s.current_pair(&[]).is_empty());
        assert_eq!(0, s.cursor());
    }

    #[test]
    fn short_lists_never_rotate() {
        let lists = vec![
            vec![arrival("GR", "Greenbelt", "ARR")],
            vec![arrival("GR", "Greenbelt", "ARR"), arrival("GR", "Branch Av", "3")],
        ];

        for list in lists {
            let mut s = scheduler();
            for t in (0..60).map(|x| x * 5) {
                assert!(!s.tick(at(t), &list));
                assert_eq!(0, s.cursor());
                let pair: Vec<Arrival> = s.current_pair(&list).into_iter().cloned().collect();
                assert_eq!(list, pair);
            }
        }
    }

    #[test]
    fn rotates_through_four() {
        let list = four();
        let mut s = scheduler();

        let mut cursors = vec![s.cursor()];
        let mut pairs = vec![destinations(s.current_pair(&list))];
        for step in 1..=4 {
            assert!(s.tick(at(step * 5), &list));
            cursors.push(s.cursor());
            pairs.push(destinations(s.current_pair(&list)));
        }

        assert_eq!(vec![0, 1, 2, 3, 0], cursors);
        assert_eq!(vec![
            vec!["A", "B"],
            vec!["B", "C"],
            vec!["C", "D"],
            vec!["D", "A"],
            vec!["A", "B"],
        ], pairs);
    }

    #[test]
    fn waits_for_interval() {
        let list = four();
        let mut s = scheduler();

        assert!(!s.tick(at(1), &list));
        assert!(!s.tick(at(4), &list));
        assert_eq!(0, s.cursor());
        assert!(s.tick(at(5), &list));
        assert_eq!(1, s.cursor());
        assert!(!s.tick(at(9), &list));
        assert!(s.tick(at(10), &list));
        assert_eq!(2, s.cursor());
    }

    #[test]
    fn pair_elements_are_distinct() {
        for n in 3..8 {
            let list: Vec<Arrival> = (0..n).map(|i| arrival("BL", &format!("D{}", i), "5")).collect();
            let mut s = scheduler();
            let mut seen = vec![];

            for step in 1..=n {
                let pair = s.current_pair(&list);
                assert_eq!(2, pair.len());
                assert_ne!(pair[0], pair[1]);
                seen.push(s.cursor());
                s.tick(at(step as i64 * 5), &list);
            }
            seen.push(s.cursor());

            let expected: Vec<usize> = (0..n).chain(std::iter::once(0)).collect();
            assert_eq!(expected, seen);
        }
    }

    #[test]
    fn shrinking_list_resets_cursor() {
        let list = four();
        let mut s = scheduler();
        for step in 1..=3 {
            s.tick(at(step * 5), &list);
        }
        assert_eq!(3, s.cursor());

        let shorter = vec![arrival("OR", "Vienna", "2"), arrival("OR", "New Carrollton", "6"), arrival("OR", "Vienna", "14")];
        // Not due yet, but the cursor must still be valid.
        assert!(!s.tick(at(16), &shorter));
        assert_eq!(0, s.cursor());
        assert_eq!(vec!["Vienna", "New Carrollton"], destinations(s.current_pair(&shorter)));
    }

    #[test]
    fn dropping_to_two_resets_cursor() {
        let list = four();
        let mut s = scheduler();
        s.tick(at(5), &list);
        s.tick(at(10), &list);
        assert_eq!(2, s.cursor());

        let two = vec![arrival("RD", "A", "1"), arrival("RD", "B", "2")];
        s.tick(at(11), &two);
        assert_eq!(0, s.cursor());
        assert_eq!(vec!["A", "B"], destinations(s.current_pair(&two)));
    }

    #[test]
    fn pair_is_valid_before_tick_sees_new_list() {
        let list = four();
        let mut s = scheduler();
        for step in 1..=3 {
            s.tick(at(step * 5), &list);
        }

        let two = vec![arrival("RD", "A", "1"), arrival("RD", "B", "2")];
        assert_eq!(vec!["A", "B"], destinations(s.current_pair(&two)));
    }
}
