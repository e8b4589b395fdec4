//! Character selection, arena and code controls.

use crate::{
    arena::{Arena, GenerateArena},
    code::{ApplyCode, CodeInput, CodeStatus, GenerateCode},
    rig::SelectCharacter,
    session::Session,
};
use bevy::{
    ecs::hierarchy::ChildSpawnerCommands,
    input::keyboard::{Key, KeyboardInput},
    prelude::*,
};
use shared::CharacterId;

const PANEL_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);
const BUTTON_BG: Color = Color::srgb(0.2, 0.2, 0.25);
const BUTTON_HOVERED: Color = Color::srgb(0.3, 0.3, 0.4);
const BUTTON_PRESSED: Color = Color::srgb(0.45, 0.35, 0.2);
const BUTTON_DISABLED: Color = Color::srgb(0.1, 0.1, 0.1);
const FIELD_BG: Color = Color::srgb(0.08, 0.08, 0.1);
const FIELD_FOCUSED: Color = Color::srgb(0.15, 0.15, 0.25);
const ERROR_COLOR: Color = Color::srgb(1.0, 0.35, 0.3);

const CODE_PLACEHOLDER: &str = "Click to enter a code";
const MAX_CODE_LEN: usize = 256;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    Select(CharacterId),
    GenerateArena,
    GenerateCode,
    FocusCodeField,
    ApplyCode,
}

#[derive(Component)]
struct IntroPanel;

#[derive(Component)]
struct ControlsPanel;

/// Button that no longer reacts to clicks.
#[derive(Component)]
struct Disabled;

#[derive(Component)]
struct CodeFieldText;

#[derive(Component)]
struct GeneratedCodeText;

#[derive(Component)]
struct StatusText;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_ui);
    app.add_systems(
        Update,
        (
            handle_clicks,
            blur_on_outside_click,
            type_code,
            show_controls_after_pick.run_if(resource_changed::<Session>),
            disable_arena_button.run_if(resource_changed::<Arena>),
            refresh_code_texts,
            paint_buttons,
        )
            .chain(),
    );
}

fn label(text: impl Into<String>, font_size: f32) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn panel_node() -> Node {
    Node {
        position_type: PositionType::Absolute,
        top: Val::Px(12.0),
        left: Val::Px(12.0),
        flex_direction: FlexDirection::Column,
        row_gap: Val::Px(6.0),
        padding: UiRect::all(Val::Px(10.0)),
        ..default()
    }
}

fn button(parent: &mut ChildSpawnerCommands, text: &str, action: UiAction) {
    parent
        .spawn((
            Name::new(text.to_string()),
            Button,
            action,
            Node {
                padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(BUTTON_BG),
        ))
        .with_children(|b| {
            b.spawn(label(text, 16.0));
        });
}

fn spawn_ui(mut commands: Commands) {
    commands
        .spawn((
            Name::new("IntroScreen"),
            IntroPanel,
            panel_node(),
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn(label("Smash 3D", 28.0));
            panel.spawn(label("Choose your fighter", 16.0));
            for character in CharacterId::ALL {
                button(panel, character.display_name(), UiAction::Select(character));
            }
        });

    commands
        .spawn((
            Name::new("Controls"),
            ControlsPanel,
            Node {
                display: Display::None,
                ..panel_node()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn(label("WASD or arrow keys to move", 14.0));
            button(panel, "Generate Arena", UiAction::GenerateArena);
            button(panel, "Generate Code", UiAction::GenerateCode);
            panel.spawn((GeneratedCodeText, label("", 14.0)));
            panel
                .spawn((
                    Name::new("CodeInput"),
                    Button,
                    UiAction::FocusCodeField,
                    Node {
                        min_width: Val::Px(280.0),
                        padding: UiRect::all(Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(FIELD_BG),
                ))
                .with_children(|field| {
                    field.spawn((CodeFieldText, label(CODE_PLACEHOLDER, 14.0)));
                });
            button(panel, "Apply Code", UiAction::ApplyCode);
            panel.spawn((
                StatusText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(ERROR_COLOR),
            ));
        });
}

fn handle_clicks(
    interactions: Query<(&Interaction, &UiAction, Has<Disabled>), Changed<Interaction>>,
    mut session: ResMut<Session>,
    mut select: MessageWriter<SelectCharacter>,
    mut generate_arena: MessageWriter<GenerateArena>,
    mut generate_code: MessageWriter<GenerateCode>,
    mut apply_code: MessageWriter<ApplyCode>,
) {
    for (interaction, action, disabled) in &interactions {
        if *interaction != Interaction::Pressed || disabled {
            continue;
        }

        let focus = *action == UiAction::FocusCodeField;
        if session.code_field_focused != focus {
            session.code_field_focused = focus;
        }

        match *action {
            UiAction::Select(character) => {
                select.write(SelectCharacter(character));
            }
            UiAction::GenerateArena => {
                generate_arena.write(GenerateArena);
            }
            UiAction::GenerateCode => {
                generate_code.write(GenerateCode);
            }
            UiAction::ApplyCode => {
                apply_code.write(ApplyCode);
            }
            UiAction::FocusCodeField => {}
        }
    }
}

/// Clicking the scene gives the keyboard back to movement.
fn blur_on_outside_click(
    mouse: Res<ButtonInput<MouseButton>>,
    interactions: Query<&Interaction, With<UiAction>>,
    mut session: ResMut<Session>,
) {
    if !session.code_field_focused || !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    if interactions.iter().all(|i| *i == Interaction::None) {
        session.code_field_focused = false;
    }
}

fn type_code(
    mut keys: MessageReader<KeyboardInput>,
    mut session: ResMut<Session>,
    mut input: ResMut<CodeInput>,
    mut apply_code: MessageWriter<ApplyCode>,
) {
    if !session.code_field_focused {
        keys.clear();
        return;
    }

    for key in keys.read() {
        if !key.state.is_pressed() {
            continue;
        }
        match &key.logical_key {
            Key::Character(text) => {
                for c in text.chars().filter(char::is_ascii_graphic) {
                    if input.0.len() < MAX_CODE_LEN {
                        input.0.push(c);
                    }
                }
            }
            Key::Backspace => {
                input.0.pop();
            }
            Key::Enter => {
                apply_code.write(ApplyCode);
            }
            Key::Escape => {
                session.code_field_focused = false;
            }
            _ => {}
        }
    }
}

fn show_controls_after_pick(
    session: Res<Session>,
    mut intro: Query<&mut Node, (With<IntroPanel>, Without<ControlsPanel>)>,
    mut controls: Query<&mut Node, (With<ControlsPanel>, Without<IntroPanel>)>,
) {
    if session.active_rig.is_none() {
        return;
    }
    for mut node in &mut intro {
        node.display = Display::None;
    }
    for mut node in &mut controls {
        node.display = Display::Flex;
    }
}

/// Arena generation is once per session; its trigger goes dead after the first use.
fn disable_arena_button(
    mut commands: Commands,
    arena: Res<Arena>,
    buttons: Query<(Entity, &UiAction), Without<Disabled>>,
) {
    if !arena.has_started() {
        return;
    }
    for (entity, action) in &buttons {
        if *action == UiAction::GenerateArena {
            commands.entity(entity).insert(Disabled);
        }
    }
}

fn refresh_code_texts(
    session: Res<Session>,
    input: Res<CodeInput>,
    status: Res<CodeStatus>,
    mut generated: Query<&mut Text, With<GeneratedCodeText>>,
    mut errors: Query<&mut Text, (With<StatusText>, Without<GeneratedCodeText>)>,
    mut field: Query<
        &mut Text,
        (
            With<CodeFieldText>,
            Without<GeneratedCodeText>,
            Without<StatusText>,
        ),
    >,
) {
    if !(session.is_changed() || input.is_changed() || status.is_changed()) {
        return;
    }

    for mut text in &mut generated {
        text.0 = status
            .generated
            .as_ref()
            .map(|code| format!("Your Game Code: {code}"))
            .unwrap_or_default();
    }
    for mut text in &mut errors {
        text.0 = status.error.unwrap_or_default().to_string();
    }
    for mut text in &mut field {
        text.0 = match (input.0.is_empty(), session.code_field_focused) {
            (true, false) => CODE_PLACEHOLDER.to_string(),
            (_, true) => format!("{}|", input.0),
            (false, false) => input.0.clone(),
        };
    }
}

fn paint_buttons(
    session: Res<Session>,
    mut buttons: Query<(&Interaction, &UiAction, &mut BackgroundColor, Has<Disabled>)>,
) {
    for (interaction, action, mut background, disabled) in &mut buttons {
        let is_field = *action == UiAction::FocusCodeField;
        let color = if disabled {
            BUTTON_DISABLED
        } else if is_field && session.code_field_focused {
            FIELD_FOCUSED
        } else {
            match interaction {
                Interaction::Pressed => BUTTON_PRESSED,
                Interaction::Hovered => BUTTON_HOVERED,
                Interaction::None if is_field => FIELD_BG,
                Interaction::None => BUTTON_BG,
            }
        };
        if background.0 != color {
            background.0 = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;

    fn controls_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Session>();
        app.init_resource::<Arena>();
        app.add_message::<SelectCharacter>();
        app.add_message::<GenerateArena>();
        app.add_message::<GenerateCode>();
        app.add_message::<ApplyCode>();
        app.add_systems(
            Update,
            (
                handle_clicks,
                disable_arena_button.run_if(resource_changed::<Arena>),
            )
                .chain(),
        );
        app
    }

    fn press(app: &mut App, button: Entity) {
        if let Some(mut interaction) = app.world_mut().get_mut::<Interaction>(button) {
            *interaction = Interaction::Pressed;
        }
        app.update();
    }

    fn arena_requests(app: &App) -> usize {
        app.world().resource::<Messages<GenerateArena>>().len()
    }

    #[test]
    fn arena_button_goes_dead_after_first_use() {
        let mut app = controls_app();
        let button = app
            .world_mut()
            .spawn((UiAction::GenerateArena, Interaction::None))
            .id();
        app.update();
        assert!(app.world().get::<Disabled>(button).is_none());

        press(&mut app, button);
        assert_eq!(arena_requests(&app), 1);

        // What the arena plugin does with the request.
        assert_eq!(app.world_mut().resource_mut::<Arena>().begin(), Ok(()));
        app.update();
        assert!(app.world().get::<Disabled>(button).is_some());

        app.world_mut()
            .resource_mut::<Messages<GenerateArena>>()
            .clear();
        press(&mut app, button);
        assert_eq!(arena_requests(&app), 0);
    }

    #[test]
    fn focusing_the_code_field_takes_the_keyboard() {
        let mut app = controls_app();
        let field = app
            .world_mut()
            .spawn((UiAction::FocusCodeField, Interaction::None))
            .id();
        let apply = app
            .world_mut()
            .spawn((UiAction::ApplyCode, Interaction::None))
            .id();

        press(&mut app, field);
        assert!(app.world().resource::<Session>().code_field_focused);

        press(&mut app, apply);
        assert!(!app.world().resource::<Session>().code_field_focused);
        assert_eq!(app.world().resource::<Messages<ApplyCode>>().len(), 1);
    }
}
