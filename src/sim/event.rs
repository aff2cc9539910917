/// Events emitted during a simulation step.
/// The session consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    GrassEaten { x: i32, y: i32 },
    PlayerHit { lives_left: u32 },
    FieldCleared,
    GrassRegrown { x: i32, y: i32 },
    GameOver,
    QuitRequested,
}
