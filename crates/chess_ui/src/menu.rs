//! Title screen and difficulty picker.

use bevy::prelude::*;
use chess_engine::Difficulty;
use log::info;

use crate::{
    despawn_screen, game::Session, palette, session::GameMode, spawn_button, text, AppView,
    GameSession,
};

pub struct MenuPlugin;

#[derive(Component)]
struct MenuScreen;

#[derive(Component, Clone, Copy)]
enum MenuAction {
    SinglePlayer,
    Multiplayer,
    Pick(Difficulty),
    Back,
}

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppView::Menu), spawn_title_screen)
            .add_systems(OnExit(AppView::Menu), despawn_screen::<MenuScreen>)
            .add_systems(OnEnter(AppView::Difficulty), spawn_difficulty_screen)
            .add_systems(OnExit(AppView::Difficulty), despawn_screen::<MenuScreen>)
            .add_systems(
                Update,
                menu_action.run_if(in_state(AppView::Menu).or_else(in_state(AppView::Difficulty))),
            );
    }
}

fn screen_root() -> NodeBundle {
    NodeBundle {
        style: Style {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(16.0),
            ..default()
        },
        ..default()
    }
}

fn spawn_title_screen(mut commands: Commands) {
    commands
        .spawn((screen_root(), MenuScreen))
        .with_children(|root| {
            root.spawn(text("ZEN", 72.0, palette::TEXT));
            root.spawn(text("CHESS", 72.0, palette::MUTED).with_style(Style {
                margin: UiRect::bottom(Val::Px(40.0)),
                ..default()
            }));
            spawn_button(root, MenuAction::SinglePlayer, Val::Px(320.0), "Single Player", None);
            spawn_button(root, MenuAction::Multiplayer, Val::Px(320.0), "Multiplayer", None);
            root.spawn(text("DESIGNED FOR FOCUS", 10.0, palette::BORDER).with_style(Style {
                margin: UiRect::top(Val::Px(48.0)),
                ..default()
            }));
        });
}

fn spawn_difficulty_screen(mut commands: Commands) {
    commands
        .spawn((screen_root(), MenuScreen))
        .with_children(|root| {
            root.spawn(text("SELECT DIFFICULTY", 12.0, palette::MUTED).with_style(Style {
                margin: UiRect::bottom(Val::Px(32.0)),
                ..default()
            }));
            for difficulty in Difficulty::ALL {
                spawn_button(
                    root,
                    MenuAction::Pick(difficulty),
                    Val::Px(420.0),
                    difficulty.label(),
                    Some(difficulty.tagline()),
                );
            }
            spawn_button(root, MenuAction::Back, Val::Px(120.0), "<  Back", None);
        });
}

fn menu_action(
    interactions: Query<(&Interaction, &MenuAction), Changed<Interaction>>,
    mut session: ResMut<Session>,
    mut next_view: ResMut<NextState<AppView>>,
) {
    for (interaction, action) in interactions.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match *action {
            MenuAction::SinglePlayer => next_view.set(AppView::Difficulty),
            MenuAction::Multiplayer => {
                let difficulty = session.difficulty();
                **session = GameSession::new(GameMode::PlayerVsPlayer, difficulty);
                info!("starting a two player game");
                next_view.set(AppView::Game);
            }
            MenuAction::Pick(difficulty) => {
                **session = GameSession::new(GameMode::PlayerVsComputer, difficulty);
                info!("starting a game against the computer on {difficulty}");
                next_view.set(AppView::Game);
            }
            MenuAction::Back => next_view.set(AppView::Menu),
        }
    }
}
