//! Input systems: PlayerIntent → InputBuffer → старт action'ов

use bevy::prelude::*;

use crate::actions::{ActionLoadout, ActionTable};
use crate::components::Player;
use crate::config::CombatTuning;
use crate::state::{ActorStateMachine, StateChangeRequest, TransitionRequest};

use super::{resolve_opener, ComboContinuation, InputBuffer, InputKind};

/// Нажатие игрока (inbound от input layer движка)
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerIntent {
    pub entity: Entity,
    pub kind: InputKind,
}

impl PlayerIntent {
    pub fn new(entity: Entity, kind: InputKind) -> Self {
        Self { entity, kind }
    }
}

/// TTL countdown всех буферов
pub fn tick_input_buffers(time: Res<Time>, mut buffers: Query<&mut InputBuffer>) {
    let delta = time.delta_secs();
    for mut buffer in buffers.iter_mut() {
        if !buffer.is_empty() {
            buffer.tick(delta);
        }
    }
}

/// PlayerIntent → InputBuffer (TTL из CombatTuning)
pub fn buffer_player_intents(
    mut intents: EventReader<PlayerIntent>,
    mut players: Query<(&ActorStateMachine, &mut InputBuffer), With<Player>>,
    tuning: Res<CombatTuning>,
) {
    for intent in intents.read() {
        let Ok((machine, mut buffer)) = players.get_mut(intent.entity) else {
            continue;
        };

        if machine.is_dead() {
            continue;
        }

        buffer.press(intent.kind, tuning.input_buffer_ttl);
    }
}

/// Idle / Locomotion / Combat-Ready: buffered input → Attacking (opener) или Dodging.
///
/// Внутри action'а буфер читает только timeline executor (combo окно).
pub fn start_player_actions(
    mut players: Query<(Entity, &ActorStateMachine, &mut InputBuffer, &ActionLoadout), With<Player>>,
    table: Res<ActionTable>,
    mut requests: EventWriter<StateChangeRequest>,
) {
    for (entity, machine, mut buffer, loadout) in players.iter_mut() {
        if !machine.can_attack() || buffer.is_empty() {
            continue;
        }

        let opener = loadout.opener();
        let continuation = resolve_opener(&mut buffer, opener.is_some(), loadout.dodge.is_some());

        let request = match (continuation, opener, loadout.dodge.as_ref()) {
            (Some(ComboContinuation::Step { charged }), Some(opener), _) => {
                let supports_charge = match table.get(opener) {
                    Ok(definition) => definition.supports_charge,
                    Err(err) => {
                        crate::log_error(&format!("❌ {:?}: opener unavailable: {}", entity, err));
                        continue;
                    }
                };
                TransitionRequest::attack(opener.clone(), charged && supports_charge)
            }
            (Some(ComboContinuation::Dodge), _, Some(dodge)) => TransitionRequest::dodge(dodge.clone()),
            _ => continue,
        };

        requests.write(StateChangeRequest::new(entity, request));
    }
}
