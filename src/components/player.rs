//! Player state machine.
//!
//! States: `idle`, `run`, `crouch`, `up` (rising), `down` (falling) and
//! `hurt`. Each frame the player's systems run, in order: [`Player::apply_motion`]
//! (gravity and run lerp), the mover, then [`Player::update_logic`], which
//! reads the fresh floor/wall flags and input edges and picks the next
//! state. Side effects of a change live in [`PLAYER_TRANSITIONS`] and are
//! applied by [`Player::set_state`], the only way the state changes.
//!
//! Damage arrives through [`Player::ouch`]; recovery from `hurt` is driven
//! by the hurt timer and followed by a period of invincibility during which
//! the sprite blinks.

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::animation::Animator;
use crate::components::kinematic::{CollisionResponse, Contact, Kinematic};
use crate::components::rigidbody::RigidBody;
use crate::components::statemachine::{StateLabel, Transition, effects_for};
use crate::components::timer::Timer;
use crate::resources::gameconfig::PlayerTuning;
use crate::resources::input::InputState;
use crate::resources::tilegrid::{DoorDirection, DoorLink, TileCategory};

/// Player box size in pixels.
pub const PLAYER_SIZE: (f32, f32) = (6.0, 31.0);

/// Animations the player state machine plays.
pub const PLAYER_ANIMATIONS: [&str; 12] = [
    "idle",
    "run",
    "turn",
    "idle_to_run",
    "run_to_idle",
    "crouch",
    "crouch_to_idle",
    "up",
    "up_to_down",
    "down",
    "land",
    "hurt",
];

/// Horizontal speeds below this snap to zero.
const RUN_SNAP: f32 = 0.001;

/// Vertical speed is divided by this when touching an up door.
const UP_DOOR_DAMPING: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Idle,
    Run,
    Crouch,
    Up,
    Down,
    Hurt,
}

impl StateLabel for PlayerState {
    const ALL: &'static [Self] = &[
        PlayerState::Idle,
        PlayerState::Run,
        PlayerState::Crouch,
        PlayerState::Up,
        PlayerState::Down,
        PlayerState::Hurt,
    ];

    fn label(self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Run => "run",
            PlayerState::Crouch => "crouch",
            PlayerState::Up => "up",
            PlayerState::Down => "down",
            PlayerState::Hurt => "hurt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEffect {
    /// Vertical velocity = jump impulse.
    Jump,
    /// Vertical velocity = 0.
    StopFall,
    HeavyGravity,
    NormalGravity,
    HurtMaxRun,
    NormalMaxRun,
    RestartHurtTimer,
    Play(&'static str),
    /// `idle_to_run` when still facing the same way, `turn` otherwise.
    PlayRunStart,
}

use PlayerEffect as Fx;
use PlayerState as S;

const TO_RUN: &[PlayerEffect] = &[Fx::PlayRunStart];
const TO_CROUCH: &[PlayerEffect] = &[Fx::Play("crouch")];
const TO_UP: &[PlayerEffect] = &[Fx::Jump, Fx::Play("up")];
const TO_DOWN: &[PlayerEffect] = &[Fx::StopFall, Fx::HeavyGravity, Fx::Play("up_to_down")];
const TO_HURT: &[PlayerEffect] = &[
    Fx::StopFall,
    Fx::HurtMaxRun,
    Fx::RestartHurtTimer,
    Fx::Play("hurt"),
];

/// Side effects of every player state change. Re-entering a state restarts
/// its animation and timers through the `(s, s)` rows.
pub static PLAYER_TRANSITIONS: [Transition<PlayerState, PlayerEffect>; 35] = [
    Transition::leaving(S::Down, &[Fx::NormalGravity]),
    Transition::leaving(S::Hurt, &[Fx::NormalMaxRun]),
    // re-entry
    Transition::new(S::Idle, S::Idle, &[Fx::Play("idle")]),
    Transition::new(S::Run, S::Run, &[Fx::Play("run")]),
    Transition::new(S::Crouch, S::Crouch, TO_CROUCH),
    Transition::new(S::Up, S::Up, TO_UP),
    Transition::new(S::Down, S::Down, TO_DOWN),
    Transition::new(S::Hurt, S::Hurt, TO_HURT),
    // idle
    Transition::new(S::Idle, S::Run, TO_RUN),
    Transition::new(S::Idle, S::Crouch, TO_CROUCH),
    Transition::new(S::Idle, S::Up, TO_UP),
    Transition::new(S::Idle, S::Down, TO_DOWN),
    Transition::new(S::Idle, S::Hurt, TO_HURT),
    // run
    Transition::new(S::Run, S::Idle, &[Fx::Play("run_to_idle")]),
    Transition::new(S::Run, S::Crouch, TO_CROUCH),
    Transition::new(S::Run, S::Up, TO_UP),
    Transition::new(S::Run, S::Down, TO_DOWN),
    Transition::new(S::Run, S::Hurt, TO_HURT),
    // crouch
    Transition::new(S::Crouch, S::Idle, &[Fx::Play("crouch_to_idle")]),
    Transition::new(S::Crouch, S::Run, TO_RUN),
    Transition::new(S::Crouch, S::Up, TO_UP),
    Transition::new(S::Crouch, S::Down, TO_DOWN),
    Transition::new(S::Crouch, S::Hurt, TO_HURT),
    // up
    Transition::new(S::Up, S::Down, &[Fx::HeavyGravity, Fx::Play("up_to_down")]),
    Transition::new(S::Up, S::Hurt, TO_HURT),
    // down
    Transition::new(S::Down, S::Idle, &[Fx::Play("land")]),
    Transition::new(S::Down, S::Run, TO_RUN),
    Transition::new(S::Down, S::Crouch, TO_CROUCH),
    Transition::new(S::Down, S::Up, TO_UP),
    Transition::new(S::Down, S::Hurt, TO_HURT),
    // hurt
    Transition::new(S::Hurt, S::Idle, &[Fx::Play("land")]),
    Transition::new(S::Hurt, S::Run, TO_RUN),
    Transition::new(S::Hurt, S::Crouch, TO_CROUCH),
    Transition::new(S::Hurt, S::Up, TO_UP),
    Transition::new(S::Hurt, S::Down, TO_DOWN),
];

/// Inputs of one logic step, snapshotted after the mover ran.
#[derive(Debug, Clone, Copy)]
struct Cues {
    on_floor: bool,
    on_wall: bool,
    jump_pressed: bool,
    jump_released: bool,
    down_held: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub state: PlayerState,
    pub tuning: PlayerTuning,
    /// Horizontal intent this frame: -1, 0 or 1.
    pub direction: i32,
    pub facing: i32,
    pub old_facing: i32,
    /// Side the last hit came from; drives movement while hurt.
    pub pain_direction: i32,
    pub gravity: f32,
    pub max_run: f32,
    pub was_on_floor: bool,
    /// Pass through thin platforms for the next move.
    pub thin_fall: bool,
    pub invincible: bool,
    pub hidden: bool,
    pub hurt_timer: Timer,
    pub invincibility_timer: Timer,
    /// Category of the last cell the mover reported.
    pub last_contact: Option<TileCategory>,
    /// First door touched since the last logic step.
    pub door_contact: Option<DoorLink>,
}

impl Player {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            state: PlayerState::Idle,
            tuning,
            direction: 0,
            facing: 1,
            old_facing: 1,
            pain_direction: 0,
            gravity: tuning.normal_gravity,
            max_run: tuning.normal_max_run,
            was_on_floor: false,
            thin_fall: false,
            invincible: false,
            hidden: false,
            hurt_timer: Timer::new(tuning.hurt_ms),
            invincibility_timer: Timer::new(tuning.invincible_ms),
            last_contact: None,
            door_contact: None,
        }
    }

    /// Change state, running the table's side effects first.
    pub fn set_state(&mut self, next: PlayerState, body: &mut RigidBody, animator: &mut Animator) {
        let previous = self.state;
        for effect in effects_for(&PLAYER_TRANSITIONS, previous, next) {
            match *effect {
                Fx::Jump => body.velocity.y = self.tuning.jump_velocity,
                Fx::StopFall => body.velocity.y = 0.0,
                Fx::HeavyGravity => self.gravity = self.tuning.heavy_gravity,
                Fx::NormalGravity => self.gravity = self.tuning.normal_gravity,
                Fx::HurtMaxRun => self.max_run = self.tuning.hurt_max_run,
                Fx::NormalMaxRun => self.max_run = self.tuning.normal_max_run,
                Fx::RestartHurtTimer => self.hurt_timer.reset(),
                Fx::Play(name) => animator.play(name),
                Fx::PlayRunStart => {
                    if self.old_facing == self.facing {
                        animator.play("idle_to_run");
                    } else {
                        animator.play("turn");
                    }
                }
            }
        }
        self.state = next;
        debug!("player: {} -> {}", previous.label(), next.label());
    }

    /// Gravity and horizontal run lerp, before the mover.
    pub fn apply_motion(&mut self, body: &mut RigidBody, on_floor: bool, dt: f32) {
        body.fall(self.gravity, self.tuning.max_fall, dt);

        let target = self.direction as f32 * self.max_run;
        let vx = body.velocity.x;
        body.velocity.x = vx + (target - vx) * self.tuning.run_lerp_weight;
        if body.velocity.x.abs() < RUN_SNAP {
            body.velocity.x = 0.0;
        }

        self.was_on_floor = on_floor;
    }

    /// Per-state rules, after the mover.
    pub fn update_logic(
        &mut self,
        input: &InputState,
        kinematic: &Kinematic,
        body: &mut RigidBody,
        animator: &mut Animator,
        dt: f32,
    ) {
        self.thin_fall = false;

        if self.direction != 0 {
            self.old_facing = self.facing;
        }
        self.direction = input.direction();
        if self.direction != 0 {
            self.facing = self.direction;
        }

        let cues = Cues {
            on_floor: kinematic.on_floor,
            on_wall: kinematic.on_wall,
            jump_pressed: input.jump.just_pressed,
            jump_released: input.jump.just_released,
            down_held: input.down.active,
        };

        match self.state {
            S::Idle => {
                if let Some(next) = self.grounded_exit(&cues, false) {
                    return self.set_state(next, body, animator);
                }
                self.tick_invincibility(dt);
            }
            S::Run => {
                if let Some(next) = self.grounded_exit(&cues, true) {
                    return self.set_state(next, body, animator);
                }
                if self.old_facing != self.facing {
                    animator.play("turn");
                }
                self.tick_invincibility(dt);
            }
            S::Crouch => {
                if !cues.on_floor {
                    return self.set_state(S::Down, body, animator);
                }
                if self.settled(&cues) && !cues.down_held {
                    return self.set_state(S::Idle, body, animator);
                }
                if cues.down_held && cues.jump_pressed {
                    if self.last_contact == Some(TileCategory::Thin) {
                        self.thin_fall = true;
                        return;
                    }
                    return self.set_state(S::Up, body, animator);
                }
                if self.run_input(&cues) && !cues.down_held {
                    return self.set_state(S::Run, body, animator);
                }
                self.direction = 0;
                self.old_facing = self.facing;
                self.tick_invincibility(dt);
            }
            S::Up => {
                if body.velocity.y > 0.0 {
                    return self.set_state(S::Down, body, animator);
                }
                if cues.jump_released {
                    self.gravity = self.tuning.heavy_gravity;
                }
                self.tick_invincibility(dt);
            }
            S::Down => {
                if let Some(next) = self.landing_exit(&cues) {
                    return self.set_state(next, body, animator);
                }
                self.tick_invincibility(dt);
            }
            S::Hurt => {
                if self.was_on_floor && !cues.on_floor {
                    body.velocity.y = 0.0;
                }
                self.direction = self.pain_direction;
                if self.hurt_timer.tick(dt) {
                    self.on_hurt_timer_end(&cues, body, animator);
                }
                self.hidden = !self.hidden;
            }
        }
    }

    /// Damage from `pain_direction` (-1 left, 1 right). Ignored while
    /// invincible or already hurt.
    pub fn ouch(&mut self, pain_direction: i32, body: &mut RigidBody, animator: &mut Animator) {
        if self.invincible || self.state == S::Hurt {
            return;
        }
        self.pain_direction = pain_direction;
        self.set_state(S::Hurt, body, animator);
    }

    /// Sprite mirroring follows facing, except where the pose is fixed.
    pub fn flip_h(&self, current: bool) -> bool {
        match self.state {
            S::Idle | S::Hurt => current,
            _ => self.facing < 0,
        }
    }

    fn on_hurt_timer_end(&mut self, cues: &Cues, body: &mut RigidBody, animator: &mut Animator) {
        self.invincible = true;
        self.invincibility_timer.reset();
        if let Some(next) = self.landing_exit(cues) {
            self.set_state(next, body, animator);
        } else if !cues.on_floor {
            self.set_state(S::Down, body, animator);
        }
    }

    fn tick_invincibility(&mut self, dt: f32) {
        if !self.invincible {
            return;
        }
        if self.invincibility_timer.tick(dt) {
            self.invincible = false;
            self.hidden = false;
            return;
        }
        self.hidden = !self.hidden;
    }

    fn settled(&self, cues: &Cues) -> bool {
        cues.on_floor && (self.direction == 0 || cues.on_wall)
    }

    fn run_input(&self, cues: &Cues) -> bool {
        cues.on_floor && self.direction != 0 && !cues.on_wall
    }

    /// Shared exits of idle and run. `running` swaps the run rule for the
    /// settle rule and checks it before the jump.
    fn grounded_exit(&self, cues: &Cues, running: bool) -> Option<PlayerState> {
        if !cues.on_floor {
            return Some(S::Down);
        }
        if running && self.settled(cues) {
            return Some(S::Idle);
        }
        if cues.jump_pressed {
            return Some(S::Up);
        }
        if !running && self.run_input(cues) {
            return Some(S::Run);
        }
        if cues.down_held {
            return Some(S::Crouch);
        }
        None
    }

    /// Exits of `down` and of a finished `hurt`, both needing floor contact.
    fn landing_exit(&self, cues: &Cues) -> Option<PlayerState> {
        if !cues.on_floor {
            return None;
        }
        if self.settled(cues) {
            Some(S::Idle)
        } else if cues.jump_pressed {
            Some(S::Up)
        } else if self.run_input(cues) {
            Some(S::Run)
        } else if cues.down_held {
            Some(S::Crouch)
        } else {
            None
        }
    }
}

impl CollisionResponse for Player {
    fn on_collide(&mut self, contact: &mut Contact<'_>) -> bool {
        for cell in contact.cells {
            self.last_contact = Some(cell.category);
            match cell.category {
                TileCategory::Solid => return true,
                TileCategory::Thin => {
                    if !self.thin_fall && contact.lands_flush_on(cell) {
                        return true;
                    }
                }
                TileCategory::Door => {
                    let Some(link) = &cell.door else {
                        return false;
                    };
                    if self.door_contact.is_none() {
                        self.door_contact = Some(link.clone());
                    }
                    match link.direction {
                        DoorDirection::Left | DoorDirection::Right => contact.velocity.y = 0.0,
                        DoorDirection::Up => {
                            contact.velocity.y /= UP_DOOR_DAMPING;
                            contact.velocity.x = 0.0;
                        }
                        DoorDirection::Down => contact.velocity.x = 0.0,
                    }
                    return false;
                }
                TileCategory::Other => {}
            }
        }
        false
    }
}
