/// One of the six directions a camera can be pushed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 6] = [
        MoveDirection::Forward,
        MoveDirection::Backward,
        MoveDirection::Left,
        MoveDirection::Right,
        MoveDirection::Up,
        MoveDirection::Down,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of directions currently held down.
///
/// The driver inserts on key press and removes on key release; the camera
/// reads the whole set once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    bits: u8,
}

impl Movement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dir: MoveDirection) {
        self.bits |= dir.bit();
    }

    pub fn remove(&mut self, dir: MoveDirection) {
        self.bits &= !dir.bit();
    }

    /// Insert when `held`, remove otherwise.
    pub fn set(&mut self, dir: MoveDirection, held: bool) {
        if held {
            self.insert(dir);
        } else {
            self.remove(dir);
        }
    }

    pub fn contains(&self, dir: MoveDirection) -> bool {
        self.bits & dir.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Held directions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = MoveDirection> + '_ {
        MoveDirection::ALL
            .into_iter()
            .filter(move |d| self.contains(*d))
    }
}

impl FromIterator<MoveDirection> for Movement {
    fn from_iter<I: IntoIterator<Item = MoveDirection>>(iter: I) -> Self {
        let mut m = Movement::new();
        for dir in iter {
            m.insert(dir);
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let m = Movement::new();
        assert!(m.is_empty());
        assert_eq!(m.iter().count(), 0);
    }

    #[test]
    fn insert_and_remove() {
        let mut m = Movement::new();
        m.insert(MoveDirection::Forward);
        m.insert(MoveDirection::Up);
        assert!(m.contains(MoveDirection::Forward));
        assert!(m.contains(MoveDirection::Up));
        assert!(!m.contains(MoveDirection::Left));

        m.remove(MoveDirection::Forward);
        assert!(!m.contains(MoveDirection::Forward));
        assert!(m.contains(MoveDirection::Up));
    }

    #[test]
    fn set_follows_held_flag() {
        let mut m = Movement::new();
        m.set(MoveDirection::Right, true);
        assert!(m.contains(MoveDirection::Right));
        m.set(MoveDirection::Right, false);
        assert!(m.is_empty());
    }

    #[test]
    fn iter_preserves_declaration_order() {
        let m: Movement = [MoveDirection::Down, MoveDirection::Forward]
            .into_iter()
            .collect();
        let dirs: Vec<_> = m.iter().collect();
        assert_eq!(dirs, vec![MoveDirection::Forward, MoveDirection::Down]);
    }
}
