//! The board screen: rendering, player input and the computer opponent.

use std::time::Duration;

use bevy::{
    prelude::*,
    sprite::Anchor,
    tasks::{AsyncComputeTaskPool, Task},
    window::PrimaryWindow,
};
use chess_core::{piece::Color as ChessColor, Move};
use chess_engine::{ChessAI, SearchError};
use futures_lite::future;
use log::{debug, error, warn};

use crate::{
    despawn_screen,
    layout::{BoardLayout, SIDEBAR_WIDTH},
    palette, spawn_button, text, AppView, ChessAssets, ClickOutcome, GameMode, GameSession,
};

/// Pause before the computer starts thinking, so the player's move is seen.
const AI_DELAY: Duration = Duration::from_millis(100);
const PIECE_SPEED: f32 = 500.0;
const SQUARE_Z: f32 = 1.0;
const HINT_Z: f32 = 2.0;
const PIECE_Z: f32 = 3.0;

pub struct GamePlugin;

#[derive(Resource, Default, Deref, DerefMut)]
pub struct Session(pub GameSession);

type ComputerTask = Task<Result<Option<Move>, SearchError>>;

#[derive(Resource)]
struct ComputerPlayer {
    delay: Timer,
    task: Option<ComputerTask>,
}

impl Default for ComputerPlayer {
    fn default() -> Self {
        Self {
            delay: Timer::new(AI_DELAY, TimerMode::Once),
            task: None,
        }
    }
}

impl ComputerPlayer {
    fn cancel(&mut self) {
        // Dropping a task cancels it.
        self.task = None;
        self.delay.reset();
    }
}

#[derive(Component)]
struct GameScreen;

#[derive(Component)]
struct BoardFrame;

#[derive(Component, Copy, Clone)]
struct BoardSquare {
    position: chess_core::Position,
}

#[derive(Component)]
struct PieceSprite;

#[derive(Component)]
struct MoveHint;

#[derive(Component)]
struct MovingPiece {
    target_position: Vec3,
    speed: f32,
}

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct CapturedRow(ChessColor);

#[derive(Component, Clone, Copy)]
enum GameAction {
    Restart,
    Back,
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Session>()
            .init_resource::<ComputerPlayer>()
            .init_resource::<BoardLayout>()
            .add_systems(OnEnter(AppView::Game), (spawn_board, spawn_sidebar))
            .add_systems(OnExit(AppView::Game), (despawn_screen::<GameScreen>, stop_computer))
            .add_systems(
                Update,
                (
                    fit_to_window,
                    game_action,
                    handle_input,
                    drive_computer,
                    paint_squares,
                    sync_pieces,
                    show_move_hints,
                    update_sidebar,
                    update_piece_movement,
                )
                    .chain()
                    .run_if(in_state(AppView::Game)),
            );
    }
}

fn spawn_board(mut commands: Commands, layout: Res<BoardLayout>) {
    let frame_size = layout.board_size() + 20.0;
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: palette::FRAME,
                custom_size: Some(Vec2::splat(frame_size)),
                ..default()
            },
            transform: Transform::from_translation(layout.center.extend(0.0)),
            ..default()
        },
        BoardFrame,
        GameScreen,
    ));

    for position in chess_core::Position::all() {
        commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    custom_size: Some(Vec2::splat(layout.square_size)),
                    ..default()
                },
                transform: Transform::from_translation(layout.square_center(position).extend(SQUARE_Z)),
                ..default()
            },
            BoardSquare { position },
            GameScreen,
        ));
    }
}

fn spawn_sidebar(mut commands: Commands, session: Res<Session>) {
    let vs_computer = session.mode() == GameMode::PlayerVsComputer;
    let (white_label, black_label) = if vs_computer {
        ("OPPONENT", "YOU")
    } else {
        ("WHITE", "BLACK")
    };

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    right: Val::Px(0.0),
                    top: Val::Px(0.0),
                    width: Val::Px(SIDEBAR_WIDTH),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(24.0)),
                    row_gap: Val::Px(12.0),
                    border: UiRect::left(Val::Px(1.0)),
                    ..default()
                },
                border_color: palette::BORDER.into(),
                ..default()
            },
            GameScreen,
        ))
        .with_children(|sidebar| {
            sidebar
                .spawn(NodeBundle {
                    style: Style {
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        margin: UiRect::bottom(Val::Px(24.0)),
                        ..default()
                    },
                    ..default()
                })
                .with_children(|header| {
                    spawn_button(header, GameAction::Back, Val::Auto, "<", None);
                    header.spawn(text("ZEN CHESS", 14.0, palette::TEXT));
                    spawn_button(header, GameAction::Restart, Val::Auto, "Restart", None);
                });

            if vs_computer {
                sidebar.spawn(text(session.difficulty().to_string().to_uppercase(), 11.0, palette::MUTED));
            }

            sidebar.spawn(text("STATUS", 10.0, palette::MUTED));
            sidebar.spawn((text(session.status(), 36.0, palette::TEXT), StatusText));

            for (label, color) in [(white_label, ChessColor::White), (black_label, ChessColor::Black)] {
                sidebar.spawn(text(label, 10.0, palette::MUTED).with_style(Style {
                    margin: UiRect::top(Val::Px(24.0)),
                    ..default()
                }));
                sidebar.spawn((
                    NodeBundle {
                        style: Style {
                            flex_direction: FlexDirection::Row,
                            flex_wrap: FlexWrap::Wrap,
                            column_gap: Val::Px(4.0),
                            min_height: Val::Px(24.0),
                            ..default()
                        },
                        ..default()
                    },
                    CapturedRow(color),
                ));
            }
        });
}

fn stop_computer(mut computer: ResMut<ComputerPlayer>, mut session: ResMut<Session>) {
    computer.cancel();
    session.set_thinking(false);
}

fn fit_to_window(windows: Query<&Window, With<PrimaryWindow>>, mut layout: ResMut<BoardLayout>) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let fitted = BoardLayout::fit(window.width(), window.height());
    if *layout != fitted {
        *layout = fitted;
    }
}

fn game_action(
    interactions: Query<(&Interaction, &GameAction), Changed<Interaction>>,
    mut session: ResMut<Session>,
    mut computer: ResMut<ComputerPlayer>,
    mut next_view: ResMut<NextState<AppView>>,
) {
    for (interaction, action) in interactions.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            GameAction::Restart => {
                computer.cancel();
                session.reset();
                debug!("game restarted");
            }
            GameAction::Back => next_view.set(AppView::Menu),
        }
    }
}

fn handle_input(
    mouse_button: Res<Input<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    layout: Res<BoardLayout>,
    mut session: ResMut<Session>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || !session.accepts_input() {
        return;
    }
    let (Ok(window), Ok((camera, camera_transform))) = (windows.get_single(), camera_q.get_single()) else {
        return;
    };
    let Some(world_position) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor))
        .map(|ray| ray.origin.truncate())
    else {
        return;
    };
    let Some(clicked) = layout.square_at(world_position) else {
        return;
    };

    if let ClickOutcome::Moved(result) = session.click(clicked) {
        debug!("player played {}", result.mv);
    }
}

fn drive_computer(
    time: Res<Time>,
    mut session: ResMut<Session>,
    mut computer: ResMut<ComputerPlayer>,
) {
    if !session.is_computer_turn() || session.is_game_over() {
        return;
    }

    if computer.task.is_none() {
        computer.delay.tick(time.delta());
        if !computer.delay.finished() {
            return;
        }
        let board = session.board().clone();
        let ai = ChessAI::new(session.difficulty());
        session.set_thinking(true);
        computer.task = Some(AsyncComputeTaskPool::get().spawn(async move { ai.get_move(&board) }));
        return;
    }

    let Some(task) = computer.task.as_mut() else {
        return;
    };
    let Some(result) = future::block_on(future::poll_once(task)) else {
        return;
    };
    computer.cancel();
    session.set_thinking(false);

    match result {
        Ok(Some(chess_move)) => {
            if let Err(err) = session.play(chess_move) {
                warn!("board rejected the computer's move {chess_move}: {err}");
            }
        }
        Ok(None) => debug!("computer has no move to play"),
        Err(err) => error!("computer search failed: {err}"),
    }
}

fn paint_squares(
    session: Res<Session>,
    layout: Res<BoardLayout>,
    mut frames: Query<(&mut Transform, &mut Sprite), (With<BoardFrame>, Without<BoardSquare>)>,
    mut squares: Query<(&BoardSquare, &mut Transform, &mut Sprite), Without<BoardFrame>>,
) {
    if let Ok((mut transform, mut sprite)) = frames.get_single_mut() {
        sprite.custom_size = Some(Vec2::splat(layout.board_size() + 20.0));
        transform.translation = layout.center.extend(0.0);
    }

    let last_move = session.last_move();
    let selected = session.selected();
    let check = session.check_square();

    for (square, mut transform, mut sprite) in squares.iter_mut() {
        let pos = square.position;
        let mut color = if pos.is_light() {
            palette::LIGHT_SQUARE
        } else {
            palette::DARK_SQUARE
        };
        if last_move.is_some_and(|mv| mv.from == pos || mv.to == pos) {
            color = palette::LAST_MOVE;
        }
        if selected == Some(pos) {
            color = palette::SELECTED;
        }
        if check == Some(pos) {
            color = palette::CHECK;
        }
        sprite.color = color;
        sprite.custom_size = Some(Vec2::splat(layout.square_size));
        transform.translation = layout.square_center(pos).extend(SQUARE_Z);
    }
}

/// Rebuilds the piece sprites whenever the position changes. The piece that
/// just moved starts on its origin square and slides to its destination.
fn sync_pieces(
    mut commands: Commands,
    session: Res<Session>,
    layout: Res<BoardLayout>,
    assets: Res<ChessAssets>,
    pieces: Query<Entity, With<PieceSprite>>,
    mut shown: Local<Option<(usize, Option<Move>)>>,
) {
    let board = session.board();
    let key = (board.history_len(), board.last_move());
    let position_changed = *shown != Some(key);
    if !position_changed && !layout.is_changed() && !pieces.is_empty() {
        return;
    }

    let slide = if position_changed { key.1 } else { None };
    *shown = Some(key);

    for entity in pieces.iter() {
        commands.entity(entity).despawn();
    }

    for (&pos, piece) in board.get_all_pieces() {
        let target = layout.square_center(pos).extend(PIECE_Z);
        let start = match slide {
            Some(mv) if mv.to == pos => layout.square_center(mv.from).extend(PIECE_Z + 1.0),
            _ => target,
        };

        let mut entity = commands.spawn((
            SpriteBundle {
                texture: assets.piece(piece.piece_type, piece.color),
                transform: Transform::from_translation(start),
                sprite: Sprite {
                    custom_size: Some(Vec2::splat(layout.square_size * 0.9)),
                    anchor: Anchor::Center,
                    ..default()
                },
                ..default()
            },
            PieceSprite,
            GameScreen,
        ));
        if start != target {
            entity.insert(MovingPiece {
                target_position: target,
                speed: PIECE_SPEED,
            });
        }
    }
}

fn show_move_hints(
    mut commands: Commands,
    session: Res<Session>,
    layout: Res<BoardLayout>,
    assets: Res<ChessAssets>,
    hints: Query<Entity, With<MoveHint>>,
) {
    if !session.is_changed() && !layout.is_changed() {
        return;
    }

    for entity in hints.iter() {
        commands.entity(entity).despawn();
    }

    for target in session.targets() {
        commands.spawn((
            SpriteBundle {
                texture: assets.valid_move(),
                transform: Transform::from_translation(layout.square_center(target).extend(HINT_Z)),
                sprite: Sprite {
                    custom_size: Some(Vec2::splat(layout.square_size)),
                    anchor: Anchor::Center,
                    ..default()
                },
                ..default()
            },
            MoveHint,
            GameScreen,
        ));
    }
}

fn update_sidebar(
    mut commands: Commands,
    session: Res<Session>,
    assets: Res<ChessAssets>,
    mut status: Query<&mut Text, With<StatusText>>,
    rows: Query<(Entity, &CapturedRow)>,
) {
    if !session.is_changed() {
        return;
    }

    if let Ok(mut status) = status.get_single_mut() {
        status.sections[0].value = session.status().to_string();
    }

    for (entity, row) in rows.iter() {
        let color = row.0;
        commands.entity(entity).despawn_descendants().with_children(|row| {
            for &piece_type in session.captured(color) {
                row.spawn(ImageBundle {
                    style: Style {
                        width: Val::Px(22.0),
                        height: Val::Px(22.0),
                        ..default()
                    },
                    image: UiImage::new(assets.piece(piece_type, color)),
                    ..default()
                });
            }
        });
    }
}

fn update_piece_movement(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &MovingPiece)>,
) {
    for (entity, mut transform, moving) in query.iter_mut() {
        let offset = moving.target_position - transform.translation;
        let distance = offset.length();
        let step = moving.speed * time.delta_seconds();

        if distance <= step.max(1.0) {
            transform.translation = moving.target_position;
            commands.entity(entity).remove::<MovingPiece>();
        } else {
            transform.translation += offset / distance * step;
        }
    }
}
