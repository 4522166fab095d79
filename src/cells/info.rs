use serde::{Deserialize, Serialize};

use super::CellBehavior;
use crate::model::{Contribution, Reward};
use crate::world::LORE_COUNT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoTab {
    #[default]
    Tutorial,
    Log,
    Lore,
    Settings,
}

impl InfoTab {
    pub const ALL: [InfoTab; 4] = [InfoTab::Tutorial, InfoTab::Log, InfoTab::Lore, InfoTab::Settings];

    pub fn label(self) -> &'static str {
        match self {
            InfoTab::Tutorial => "Tutorial",
            InfoTab::Log => "Log",
            InfoTab::Lore => "Lore",
            InfoTab::Settings => "Settings/Info",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoState {
    pub last_tab: InfoTab,
    pub viewed_lore: Vec<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoCommand {
    SelectTab(InfoTab),
    SetLoreViewed(usize),
}

/// The help desk at the origin: tutorial, game log, lore and settings.
#[derive(Clone, Debug, Default)]
pub struct Info {
    pub state: InfoState,
}

impl Info {
    pub fn is_lore_viewed(&self, index: usize) -> bool {
        self.state.viewed_lore.get(index).copied().unwrap_or(false)
    }

    pub fn command(&mut self, command: InfoCommand) -> bool {
        match command {
            InfoCommand::SelectTab(tab) => {
                self.state.last_tab = tab;
                true
            }
            InfoCommand::SetLoreViewed(index) => {
                if index >= LORE_COUNT {
                    return false;
                }
                if self.state.viewed_lore.len() <= index {
                    self.state.viewed_lore.resize(index + 1, false);
                }
                self.state.viewed_lore[index] = true;
                true
            }
        }
    }
}

impl CellBehavior for Info {
    type State = InfoState;

    fn state(&self) -> &InfoState {
        &self.state
    }

    fn restore(&mut self, state: InfoState) {
        self.state = state;
        self.state.viewed_lore.truncate(LORE_COUNT);
    }

    fn update(&mut self, _now: f64, _neighbors: &[Contribution]) -> Option<Reward> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewed_lore_grows_on_demand() {
        let mut info = Info::default();
        assert!(!info.is_lore_viewed(4));
        info.command(InfoCommand::SetLoreViewed(4));
        assert!(info.is_lore_viewed(4));
        assert!(!info.is_lore_viewed(3));
        assert_eq!(info.state.viewed_lore.len(), 5);
    }

    #[test]
    fn lore_past_the_last_entry_is_ignored() {
        let mut info = Info::default();
        assert!(!info.command(InfoCommand::SetLoreViewed(LORE_COUNT)));
        assert!(!info.command(InfoCommand::SetLoreViewed(usize::MAX)));
        assert!(info.state.viewed_lore.is_empty());
        assert!(info.command(InfoCommand::SetLoreViewed(LORE_COUNT - 1)));
        assert_eq!(info.state.viewed_lore.len(), LORE_COUNT);
    }

    #[test]
    fn tab_is_remembered() {
        let mut info = Info::default();
        info.command(InfoCommand::SelectTab(InfoTab::Lore));
        let json = serde_json::to_value(&info.state).unwrap_or_default();
        assert_eq!(json["lastTab"], "Lore");
    }
}
