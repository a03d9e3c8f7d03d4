use bevy::{
    log::LogPlugin,
    prelude::*,
    window::{PresentMode, WindowResolution},
};
use chess_core::piece::{Color as ChessColor, PieceType as ChessPieceType};

mod game;
mod layout;
mod menu;
pub mod session;

pub use session::{ClickOutcome, GameMode, GameSession};

const LOG_FILTER: &str = "wgpu=error,naga=warn,chess_engine=debug,chess_ui=debug";

pub struct ChessUiPlugin;

/// Screen currently shown.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppView {
    #[default]
    Menu,
    Difficulty,
    Game,
}

pub(crate) mod palette {
    use bevy::prelude::Color;

    pub const BACKGROUND: Color = Color::rgb(0.035, 0.035, 0.043);
    pub const FRAME: Color = Color::rgb(0.094, 0.094, 0.106);
    pub const DARK_SQUARE: Color = Color::rgb(0.153, 0.153, 0.165);
    pub const LIGHT_SQUARE: Color = Color::rgb(0.247, 0.247, 0.275);
    pub const LAST_MOVE: Color = Color::rgb(0.21, 0.2, 0.4);
    pub const SELECTED: Color = Color::rgb(0.06, 0.4, 0.38);
    pub const CHECK: Color = Color::rgb(0.5, 0.09, 0.2);
    pub const TEXT: Color = Color::rgb(0.89, 0.89, 0.91);
    pub const MUTED: Color = Color::rgb(0.44, 0.44, 0.48);
    pub const BORDER: Color = Color::rgb(0.153, 0.153, 0.165);
    pub const BUTTON: Color = Color::rgb(0.035, 0.035, 0.043);
    pub const BUTTON_HOVER: Color = Color::rgb(0.094, 0.094, 0.106);
    pub const BUTTON_PRESSED: Color = Color::rgb(0.153, 0.153, 0.165);
}

#[derive(Resource, Clone)]
pub struct ChessAssets {
    white_king: Handle<Image>,
    white_queen: Handle<Image>,
    white_rook: Handle<Image>,
    white_bishop: Handle<Image>,
    white_knight: Handle<Image>,
    white_pawn: Handle<Image>,
    black_king: Handle<Image>,
    black_queen: Handle<Image>,
    black_rook: Handle<Image>,
    black_bishop: Handle<Image>,
    black_knight: Handle<Image>,
    black_pawn: Handle<Image>,
    valid_move: Handle<Image>,
}

impl ChessAssets {
    fn load(asset_server: &AssetServer) -> Self {
        Self {
            white_king: asset_server.load("white_king.png"),
            white_queen: asset_server.load("white_queen.png"),
            white_rook: asset_server.load("white_rook.png"),
            white_bishop: asset_server.load("white_bishop.png"),
            white_knight: asset_server.load("white_knight.png"),
            white_pawn: asset_server.load("white_pawn.png"),
            black_king: asset_server.load("black_king.png"),
            black_queen: asset_server.load("black_queen.png"),
            black_rook: asset_server.load("black_rook.png"),
            black_bishop: asset_server.load("black_bishop.png"),
            black_knight: asset_server.load("black_knight.png"),
            black_pawn: asset_server.load("black_pawn.png"),
            valid_move: asset_server.load("valid_move.png"),
        }
    }

    pub fn piece(&self, piece_type: ChessPieceType, color: ChessColor) -> Handle<Image> {
        let handle = match (piece_type, color) {
            (ChessPieceType::King, ChessColor::White) => &self.white_king,
            (ChessPieceType::Queen, ChessColor::White) => &self.white_queen,
            (ChessPieceType::Rook, ChessColor::White) => &self.white_rook,
            (ChessPieceType::Bishop, ChessColor::White) => &self.white_bishop,
            (ChessPieceType::Knight, ChessColor::White) => &self.white_knight,
            (ChessPieceType::Pawn, ChessColor::White) => &self.white_pawn,
            (ChessPieceType::King, ChessColor::Black) => &self.black_king,
            (ChessPieceType::Queen, ChessColor::Black) => &self.black_queen,
            (ChessPieceType::Rook, ChessColor::Black) => &self.black_rook,
            (ChessPieceType::Bishop, ChessColor::Black) => &self.black_bishop,
            (ChessPieceType::Knight, ChessColor::Black) => &self.black_knight,
            (ChessPieceType::Pawn, ChessColor::Black) => &self.black_pawn,
        };
        handle.clone()
    }

    pub fn valid_move(&self) -> Handle<Image> {
        self.valid_move.clone()
    }
}

impl Plugin for ChessUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Zen Chess".into(),
                        resolution: WindowResolution::new(1100.0, 800.0),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: LOG_FILTER.into(),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(palette::BACKGROUND))
        .add_state::<AppView>()
        .add_systems(Startup, setup)
        .add_systems(Update, button_hover)
        .add_plugins((menu::MenuPlugin, game::GamePlugin));
    }
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ChessAssets::load(&asset_server));
    commands.spawn(Camera2dBundle::default());
}

fn button_hover(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut background) in buttons.iter_mut() {
        *background = match interaction {
            Interaction::Pressed => palette::BUTTON_PRESSED,
            Interaction::Hovered => palette::BUTTON_HOVER,
            Interaction::None => palette::BUTTON,
        }
        .into();
    }
}

/// Removes every entity of a screen when leaving it.
pub(crate) fn despawn_screen<T: Component>(mut commands: Commands, entities: Query<Entity, With<T>>) {
    for entity in entities.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

pub(crate) fn text(value: impl Into<String>, font_size: f32, color: Color) -> TextBundle {
    TextBundle::from_section(
        value,
        TextStyle {
            font_size,
            color,
            ..default()
        },
    )
}

/// A flat button with a label and an optional caption on its right.
pub(crate) fn spawn_button(
    parent: &mut ChildBuilder,
    action: impl Component,
    width: Val,
    label: &str,
    caption: Option<&str>,
) {
    parent
        .spawn((
            ButtonBundle {
                style: Style {
                    width,
                    padding: UiRect::axes(Val::Px(20.0), Val::Px(14.0)),
                    border: UiRect::bottom(Val::Px(1.0)),
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    ..default()
                },
                background_color: palette::BUTTON.into(),
                border_color: palette::BORDER.into(),
                ..default()
            },
            action,
        ))
        .with_children(|button| {
            button.spawn(text(label, 22.0, palette::TEXT));
            if let Some(caption) = caption {
                button.spawn(text(caption.to_uppercase(), 11.0, palette::MUTED));
            }
        });
}
