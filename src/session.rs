//! Respawn and chapter-load flow.
//!
//! Both operations span several frames (a fade runs before the player is
//! moved), and both must never overlap with themselves.  Each kind is guarded
//! by an [`ExclusiveOp`]:
//!
//! - [`ExclusiveOp::try_begin`] hands out an [`OpTicket`] or `None` if one is
//!   already out.  A `None` means the request is dropped.
//! - The ticket lives inside the in-flight operation.  Dropping it, on
//!   success, on an error return, or when the resource holding it is removed,
//!   clears the flag.  There is no code path that forgets to clear it.
//!
//! A respawn resets movement and size; a chapter load only moves the player,
//! and an unknown chapter falls back to the catalog's known-good chapter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::MovementConfig;
use crate::error::SessionError;
use crate::events::MovementEvents;
use crate::movement::MovementController;
use crate::player::Player;
use crate::simulation::MovementSet;
use crate::size::SizeController;

// ── Exclusive operations ──────────────────────────────────────────────────────

/// Single-flight guard for one kind of operation.
#[derive(Debug, Default, Clone)]
pub struct ExclusiveOp {
    busy: Arc<AtomicBool>,
}

impl ExclusiveOp {
    /// Claim the operation, or `None` if it is already in flight.
    pub fn try_begin(&self) -> Option<OpTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| OpTicket {
                busy: Arc::clone(&self.busy),
            })
    }

    #[inline]
    pub fn in_progress(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that an [`ExclusiveOp`] is claimed.  Releases it on drop.
#[derive(Debug)]
pub struct OpTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for OpTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// An operation waiting out its fade.
#[derive(Debug)]
pub struct InFlight<T> {
    _ticket: OpTicket,
    pub remaining: f32,
    pub payload: T,
}

impl<T> InFlight<T> {
    pub fn new(ticket: OpTicket, remaining: f32, payload: T) -> Self {
        Self {
            _ticket: ticket,
            remaining,
            payload,
        }
    }
}

// ── Chapters ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChapterId(pub u32);

#[derive(Debug, Clone)]
pub struct ChapterDefinition {
    pub id: ChapterId,
    pub name: String,
    pub spawn: Vec3,
}

/// Every loadable chapter, plus the one to fall back to when a load fails.
#[derive(Resource, Debug, Clone)]
pub struct ChapterCatalog {
    pub chapters: Vec<ChapterDefinition>,
    pub fallback: ChapterId,
}

impl Default for ChapterCatalog {
    fn default() -> Self {
        Self {
            chapters: vec![
                ChapterDefinition {
                    id: ChapterId(1),
                    name: "Threshold".to_string(),
                    spawn: Vec3::new(0.0, 2.0, 0.0),
                },
                ChapterDefinition {
                    id: ChapterId(2),
                    name: "Crawlspace".to_string(),
                    spawn: Vec3::new(0.0, 2.0, -40.0),
                },
                ChapterDefinition {
                    id: ChapterId(3),
                    name: "Canopy".to_string(),
                    spawn: Vec3::new(30.0, 8.0, -40.0),
                },
            ],
            fallback: ChapterId(1),
        }
    }
}

impl ChapterCatalog {
    pub fn get(&self, id: ChapterId) -> Result<&ChapterDefinition, SessionError> {
        self.chapters
            .iter()
            .find(|c| c.id == id)
            .ok_or(SessionError::UnknownChapter(id))
    }

    /// The requested chapter, or the fallback chapter if it cannot be found.
    pub fn resolve(&self, requested: ChapterId) -> Result<&ChapterDefinition, SessionError> {
        self.get(requested).or_else(|err| {
            warn!("{err}; falling back to chapter {:?}", self.fallback);
            self.get(self.fallback)
        })
    }
}

/// The chapter the player is currently in.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentChapter(pub ChapterId);

impl Default for CurrentChapter {
    fn default() -> Self {
        Self(ChapterId(1))
    }
}

/// Where a respawn places the player.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint(pub Vec3);

impl Default for Checkpoint {
    fn default() -> Self {
        Self(Vec3::new(0.0, 2.0, 0.0))
    }
}

// ── Requests and in-flight state ──────────────────────────────────────────────

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RespawnRequest;

#[derive(Message, Debug, Clone, Copy)]
pub struct ChapterLoadRequest {
    pub chapter: ChapterId,
}

/// Guards for the two session operations.
#[derive(Resource, Debug, Default)]
pub struct SessionFlow {
    pub respawn: ExclusiveOp,
    pub chapter_load: ExclusiveOp,
}

#[derive(Resource, Debug, Default)]
pub struct PendingRespawn(pub Option<InFlight<()>>);

#[derive(Resource, Debug, Default)]
pub struct PendingChapterLoad(pub Option<InFlight<ChapterId>>);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionFlow>()
            .init_resource::<PendingRespawn>()
            .init_resource::<PendingChapterLoad>()
            .init_resource::<ChapterCatalog>()
            .init_resource::<CurrentChapter>()
            .init_resource::<Checkpoint>()
            .add_message::<RespawnRequest>()
            .add_message::<ChapterLoadRequest>()
            .add_systems(
                Update,
                (
                    kill_plane_system,
                    begin_respawn_system,
                    begin_chapter_load_system,
                    finish_chapter_load_system,
                    finish_respawn_system,
                )
                    .chain()
                    .in_set(MovementSet::Session),
            );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Falling below the kill plane requests a respawn.  Repeats while the player
/// is still below are absorbed by the respawn guard.
pub fn kill_plane_system(
    q: Query<&Transform, With<Player>>,
    config: Res<MovementConfig>,
    mut writer: MessageWriter<RespawnRequest>,
) {
    for transform in q.iter() {
        if transform.translation.y < config.kill_plane_y {
            writer.write(RespawnRequest);
        }
    }
}

pub fn begin_respawn_system(
    mut requests: MessageReader<RespawnRequest>,
    flow: Res<SessionFlow>,
    mut pending: ResMut<PendingRespawn>,
    config: Res<MovementConfig>,
) {
    for _ in requests.read() {
        match flow.respawn.try_begin() {
            Some(ticket) => {
                pending.0 = Some(InFlight::new(ticket, config.respawn_fade_secs, ()));
                info!("Respawn started");
            }
            None => debug!("Respawn already in progress; request ignored"),
        }
    }
}

pub fn begin_chapter_load_system(
    mut requests: MessageReader<ChapterLoadRequest>,
    flow: Res<SessionFlow>,
    mut pending: ResMut<PendingChapterLoad>,
    config: Res<MovementConfig>,
) {
    for request in requests.read() {
        match flow.chapter_load.try_begin() {
            Some(ticket) => {
                pending.0 = Some(InFlight::new(
                    ticket,
                    config.chapter_fade_secs,
                    request.chapter,
                ));
                info!("Loading chapter {:?}", request.chapter);
            }
            None => debug!(
                "Chapter load already in progress; request for {:?} ignored",
                request.chapter
            ),
        }
    }
}

/// Once the respawn fade is over: back to the checkpoint with a clean
/// movement state and Normal size.
#[allow(clippy::type_complexity)]
pub fn finish_respawn_system(
    mut pending: ResMut<PendingRespawn>,
    time: Res<Time>,
    checkpoint: Res<Checkpoint>,
    mut q: Query<
        (
            &mut Transform,
            &mut Velocity,
            &mut MovementController,
            &mut SizeController,
            &mut Collider,
            &mut MovementEvents,
        ),
        With<Player>,
    >,
) {
    if !fade_elapsed(&mut pending.0, time.delta_secs()) {
        return;
    }
    // The ticket is released when `_op` drops at the end of this scope.
    let Some(_op) = pending.0.take() else {
        return;
    };

    let result = q
        .single_mut()
        .map_err(|_| SessionError::NoPlayer)
        .map(
            |(mut transform, mut velocity, mut movement, mut size, mut collider, mut events)| {
                transform.translation = checkpoint.0;
                *velocity = Velocity::zero();
                movement.reset();
                size.reset(&mut *collider, &mut events);
            },
        );

    match result {
        Ok(()) => info!("Respawned at {:?}", checkpoint.0),
        Err(e) => warn!("Respawn aborted: {e}"),
    }
}

/// Once the chapter fade is over: resolve the chapter (or its fallback), move
/// the checkpoint and the player there.  Movement state and size persist.
pub fn finish_chapter_load_system(
    mut pending: ResMut<PendingChapterLoad>,
    time: Res<Time>,
    catalog: Res<ChapterCatalog>,
    mut current: ResMut<CurrentChapter>,
    mut checkpoint: ResMut<Checkpoint>,
    mut q: Query<(&mut Transform, &mut Velocity), With<Player>>,
) {
    if !fade_elapsed(&mut pending.0, time.delta_secs()) {
        return;
    }
    let Some(op) = pending.0.take() else {
        return;
    };

    match enter_chapter(op.payload, &catalog, &mut q) {
        Ok(chapter) => {
            current.0 = chapter.id;
            checkpoint.0 = chapter.spawn;
            info!("Entered chapter {:?} ({})", chapter.id, chapter.name);
        }
        Err(e) => error!("Chapter load failed: {e}; staying in {:?}", current.0),
    }
}

fn enter_chapter<'c>(
    requested: ChapterId,
    catalog: &'c ChapterCatalog,
    q: &mut Query<(&mut Transform, &mut Velocity), With<Player>>,
) -> Result<&'c ChapterDefinition, SessionError> {
    let chapter = catalog.resolve(requested)?;
    let (mut transform, mut velocity) = q.single_mut().map_err(|_| SessionError::NoPlayer)?;
    transform.translation = chapter.spawn;
    *velocity = Velocity::zero();
    Ok(chapter)
}

/// Tick an in-flight fade; `true` once it has run out.
fn fade_elapsed<T>(op: &mut Option<InFlight<T>>, dt: f32) -> bool {
    match op {
        Some(op) => {
            op.remaining -= dt;
            op.remaining <= 0.0
        }
        None => false,
    }
}
