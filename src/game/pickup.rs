use rand::Rng;

use super::arena::Arena;
use super::vector::Point;

/// Attempts at finding a free spot before giving up and accepting an occupied one
const SPAWN_ATTEMPTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// Grows the snake and scores a point
    Food,
    /// Temporary speed boost
    PowerUp,
}

/// A consumable object in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup<P> {
    pub kind: PickupKind,
    pub position: P,
}

impl<P: Point> Pickup<P> {
    pub fn new(kind: PickupKind, position: P) -> Self {
        Self { kind, position }
    }

    /// Spawn at a random position inside the arena, avoiding occupied spots when possible
    pub fn spawn<R, F>(kind: PickupKind, arena: &Arena, rng: &mut R, occupied: F) -> Self
    where
        R: Rng + ?Sized,
        F: Fn(P) -> bool,
    {
        let mut position = P::random_in(arena, rng);
        for _ in 1..SPAWN_ATTEMPTS {
            if !occupied(position) {
                break;
            }
            position = P::random_in(arena, rng);
        }
        Self::new(kind, position)
    }
}

/// The active pickups: at most one of each kind
#[derive(Debug, Clone, PartialEq)]
pub struct Pickups<P> {
    pub food: Pickup<P>,
    pub power_up: Option<Pickup<P>>,
}

impl<P: Point> Pickups<P> {
    pub fn new(food: P) -> Self {
        Self {
            food: Pickup::new(PickupKind::Food, food),
            power_up: None,
        }
    }

    pub fn with_power_up(mut self, position: P) -> Self {
        self.power_up = Some(Pickup::new(PickupKind::PowerUp, position));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup<P>> + '_ {
        std::iter::once(&self.food).chain(self.power_up.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::arena::ArenaShape;
    use crate::game::vector::{GridPos, Vec3};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawn_avoids_occupied_cells() {
        // A size-4 square leaves a 3x3 block of spawnable cells; all but one are taken
        let arena = Arena::new(ArenaShape::Square, 4.0);
        let free = GridPos::new(1, -1, 0);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let food = Pickup::spawn(PickupKind::Food, &arena, &mut rng, |p: GridPos| p != free);
            assert_eq!(food.position, free);
        }
    }

    #[test]
    fn test_spawn_keeps_radius_from_segments() {
        let arena = Arena::new(ArenaShape::Plane, 20.0);
        let segments = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let food = Pickup::spawn(PickupKind::Food, &arena, &mut rng, |p: Vec3| {
                segments.iter().any(|s| s.overlaps(p, 3.0))
            });
            assert!(segments.iter().all(|s| s.distance_to(food.position) >= 3.0));
        }
    }

    #[test]
    fn test_iter_lists_active_pickups() {
        let pickups = Pickups::new(GridPos::new(1, 0, 0));
        assert_eq!(pickups.iter().count(), 1);

        let pickups = pickups.with_power_up(GridPos::new(2, 0, 0));
        let kinds: Vec<_> = pickups.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PickupKind::Food, PickupKind::PowerUp]);
    }
}
