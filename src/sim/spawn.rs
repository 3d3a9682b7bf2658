//! Token spawning

use glam::Vec2;
use thiserror::Error;

use super::physics::{DynamicBodyDesc, PhysicsWorld, Shape};
use super::state::{GameEvent, Playfield, Token};

/// Why a drop was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The caller should have gated input once the budget hit zero
    #[error("no tokens left to drop")]
    BudgetExhausted,
}

impl Playfield {
    /// Drop a new token at `position` and charge it to the budget.
    ///
    /// Off-field positions are accepted as-is. With no budget left nothing is
    /// created and no state changes.
    pub fn request_spawn<W: PhysicsWorld + ?Sized>(
        &mut self,
        position: Vec2,
        world: &mut W,
    ) -> Result<&Token, SpawnError> {
        if self.score.tokens_remaining == 0 {
            log::debug!("Drop at x={} rejected: budget exhausted", position.x);
            return Err(SpawnError::BudgetExhausted);
        }

        let token_cfg = &self.config.token;
        let cats = self.config.categories;
        let radius = token_cfg.radius;
        let body = world.create_dynamic_body(DynamicBodyDesc {
            position,
            shape: Shape::Circle { radius },
            category: cats.token,
            mask: cats.token_mask(),
            friction: token_cfg.friction,
            air_friction: token_cfg.air_friction,
            bounce: token_cfg.bounce,
        });

        let id = self.next_entity_id();
        let index = self.tokens.len();
        self.tokens.push(Token {
            id,
            body,
            pos: position,
            vel: Vec2::ZERO,
            radius,
            settled: false,
            bucket: None,
        });

        self.score.tokens_remaining -= 1;
        log::debug!(
            "Token {} dropped at ({}, {}), {} left",
            id,
            position.x,
            position.y,
            self.score.tokens_remaining
        );
        self.push_event(GameEvent::TokenSpawned { token: id, pos: position });
        self.notify_score_changed();

        Ok(&self.tokens[index])
    }

    /// Drop on the drop-zone line at horizontal position `x`
    pub fn drop_at<W: PhysicsWorld + ?Sized>(
        &mut self,
        x: f32,
        world: &mut W,
    ) -> Result<&Token, SpawnError> {
        let position = Vec2::new(x, self.config.drop_line());
        self.request_spawn(position, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayfieldConfig;
    use crate::sim::filter::CollisionCategory;
    use crate::sim::world::SimWorld;

    fn field_with_budget(budget: u32) -> (Playfield, SimWorld) {
        let mut config = PlayfieldConfig::default();
        config.token.budget = budget;
        let mut world = SimWorld::new(config.gravity);
        let field = Playfield::new(config, 5, &mut world).unwrap();
        (field, world)
    }

    #[test]
    fn test_spawn_configures_body() {
        let (mut field, mut world) = field_with_budget(3);
        let cats = field.config.categories;
        let token = field.request_spawn(Vec2::new(300.0, 220.0), &mut world).unwrap().clone();

        assert!(!token.settled);
        assert_eq!(token.pos, Vec2::new(300.0, 220.0));
        assert_eq!(field.score.tokens_remaining, 2);

        let body = world.body_state(token.body).unwrap();
        assert_eq!(body.filter.category, cats.token);
        assert_eq!(body.filter.mask, cats.token | cats.pin | cats.bucket);
        assert_eq!(body.bounce, field.config.token.bounce);
        assert_eq!(body.air_friction, field.config.token.air_friction);
        assert!(!body.is_sensor);
        assert_ne!(body.filter.mask, CollisionCategory::NONE);
    }

    #[test]
    fn test_budget_conservation() {
        let (mut field, mut world) = field_with_budget(4);
        for k in 1..=4 {
            assert!(field.drop_at(500.0, &mut world).is_ok());
            assert_eq!(field.score.tokens_remaining, 4 - k);
        }
        assert_eq!(field.tokens.len(), 4);
    }

    #[test]
    fn test_exhausted_budget_rejects_without_mutation() {
        let (mut field, mut world) = field_with_budget(0);
        field.drain_events();
        let bodies = world.body_count();

        let result = field.request_spawn(Vec2::new(540.0, 220.0), &mut world);
        assert_eq!(result.err(), Some(SpawnError::BudgetExhausted));
        assert!(field.tokens.is_empty());
        assert_eq!(field.score.tokens_remaining, 0);
        assert_eq!(world.body_count(), bodies);
        assert!(field.events().is_empty());
    }

    #[test]
    fn test_off_field_drop_is_accepted() {
        let (mut field, mut world) = field_with_budget(1);
        assert!(field.drop_at(-400.0, &mut world).is_ok());
    }

    #[test]
    fn test_spawn_notifies_hud() {
        let (mut field, mut world) = field_with_budget(2);
        field.drain_events();
        let id = field.drop_at(100.0, &mut world).unwrap().id;
        let events = field.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::TokenSpawned {
                    token: id,
                    pos: Vec2::new(100.0, field.config.drop_line()),
                },
                GameEvent::ScoreChanged {
                    score: 0,
                    tokens_remaining: 1,
                },
            ]
        );
    }
}
