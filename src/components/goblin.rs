//! Melee enemy.
//!
//! A goblin wanders: it idles until the idle timer fires, walks forward until
//! the run timer fires or turns around on walls. Whenever the player's box
//! enters its aggro box it switches to `attack`, faces the player and, on the
//! configured hit frames only, tests a narrower hit box against the player.
//! When the attack animation ends it attacks again if the player is still in
//! range, otherwise it goes back to idling.

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::animation::Animator;
use crate::components::kinematic::{CollisionResponse, Contact, Kinematic, default_solidity};
use crate::components::rigidbody::RigidBody;
use crate::components::statemachine::{StateLabel, Transition, effects_for};
use crate::components::timer::Timer;
use crate::geometry::Rect;
use crate::resources::gameconfig::GoblinTuning;

pub const GOBLIN_SIZE: (f32, f32) = (6.0, 31.0);

pub const GOBLIN_ANIMATIONS: [&str; 3] = ["idle", "run", "attack"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoblinState {
    Idle,
    Run,
    Attack,
}

impl StateLabel for GoblinState {
    const ALL: &'static [Self] = &[GoblinState::Idle, GoblinState::Run, GoblinState::Attack];

    fn label(self) -> &'static str {
        match self {
            GoblinState::Idle => "idle",
            GoblinState::Run => "run",
            GoblinState::Attack => "attack",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoblinEffect {
    StopWalking,
    /// Direction = facing.
    WalkForward,
    RestartIdleTimer,
    RestartRunTimer,
    Play(&'static str),
}

use GoblinEffect as Fx;
use GoblinState as S;

pub static GOBLIN_TRANSITIONS: [Transition<GoblinState, GoblinEffect>; 3] = [
    Transition::entering(S::Idle, &[Fx::StopWalking, Fx::RestartIdleTimer, Fx::Play("idle")]),
    Transition::entering(S::Run, &[Fx::WalkForward, Fx::RestartRunTimer, Fx::Play("run")]),
    Transition::entering(S::Attack, &[Fx::StopWalking, Fx::Play("attack")]),
];

/// What a goblin knows about the player this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sighting {
    /// The player's box, when a player exists.
    pub player: Option<Rect>,
    /// The spatial index reported the player inside the aggro box.
    pub in_aggro: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Goblin {
    pub state: GoblinState,
    pub tuning: GoblinTuning,
    pub direction: i32,
    pub facing: i32,
    pub idle_timer: Timer,
    pub run_timer: Timer,
}

impl Goblin {
    pub fn new(tuning: GoblinTuning) -> Self {
        Self {
            state: GoblinState::Idle,
            direction: 0,
            facing: 1,
            idle_timer: Timer::new(tuning.idle_ms),
            run_timer: Timer::new(tuning.run_ms),
            tuning,
        }
    }

    pub fn set_state(&mut self, next: GoblinState, body: &mut RigidBody, animator: &mut Animator) {
        let previous = self.state;
        for effect in effects_for(&GOBLIN_TRANSITIONS, previous, next) {
            match *effect {
                Fx::StopWalking => {
                    self.direction = 0;
                    body.velocity.x = 0.0;
                }
                Fx::WalkForward => self.direction = self.facing,
                Fx::RestartIdleTimer => self.idle_timer.reset(),
                Fx::RestartRunTimer => self.run_timer.reset(),
                Fx::Play(name) => animator.play(name),
            }
        }
        self.state = next;
        debug!("goblin: {} -> {}", previous.label(), next.label());
    }

    pub fn apply_motion(&self, body: &mut RigidBody, dt: f32) {
        body.velocity.x = self.direction as f32 * self.tuning.max_run;
        body.fall(self.tuning.gravity, self.tuning.max_fall, dt);
    }

    pub fn aggro_box(&self, bounds: &Rect) -> Rect {
        Rect::new(0.0, 0.0, self.tuning.aggro_width, self.tuning.aggro_height)
            .centered_on(bounds.center())
    }

    pub fn hit_box(&self, bounds: &Rect) -> Rect {
        Rect::new(0.0, 0.0, self.tuning.hit_width, self.tuning.hit_height)
            .centered_on(bounds.center())
    }

    /// Per-state rules, after the mover. Returns the pain direction when
    /// this frame's attack connects.
    pub fn update_logic(
        &mut self,
        sighting: &Sighting,
        bounds: &Rect,
        kinematic: &Kinematic,
        body: &mut RigidBody,
        animator: &mut Animator,
        dt: f32,
    ) -> Option<i32> {
        match self.state {
            S::Idle => {
                if sighting.in_aggro {
                    self.set_state(S::Attack, body, animator);
                } else if self.idle_timer.tick(dt) {
                    self.set_state(S::Run, body, animator);
                }
                None
            }
            S::Run => {
                if sighting.in_aggro {
                    self.set_state(S::Attack, body, animator);
                    return None;
                }
                if kinematic.on_wall {
                    self.facing = -self.facing;
                    self.direction = self.facing;
                }
                if self.run_timer.tick(dt) {
                    self.set_state(S::Idle, body, animator);
                }
                None
            }
            S::Attack => {
                self.direction = 0;
                let player = sighting.player?;
                let pain_direction = if player.center_x() < bounds.center_x() {
                    -1
                } else {
                    1
                };
                self.facing = pain_direction;
                let striking = self.tuning.hit_frames.contains(&animator.frame_index());
                if striking && self.hit_box(bounds).overlaps(&player) {
                    Some(pain_direction)
                } else {
                    None
                }
            }
        }
    }

    /// Called when the attack animation finishes.
    pub fn on_attack_end(&mut self, in_aggro: bool, body: &mut RigidBody, animator: &mut Animator) {
        if self.state != S::Attack {
            return;
        }
        if in_aggro {
            self.set_state(S::Attack, body, animator);
        } else {
            self.set_state(S::Idle, body, animator);
        }
    }

    pub fn flip_h(&self) -> bool {
        self.facing < 0
    }
}

impl CollisionResponse for Goblin {
    fn on_collide(&mut self, contact: &mut Contact<'_>) -> bool {
        default_solidity(contact)
    }
}
