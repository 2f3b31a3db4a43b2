//! Synthesizer controller
//!
//! Ties console commands, the user settings, the frequency plan solver
//! and the register writer together. Owns the last computed plan for
//! `state` queries.

use crate::{config::*, console::*, device::*, errors::*, frequency::*};


/// Non-volatile storage for the user settings
pub trait SettingsStore {
    /// Stored settings, `None` when nothing valid is stored
    fn load(&mut self) -> Result<Option<Settings>, Error>;

    fn save(&mut self, settings: &Settings) -> Result<(), Error>;
}


/// What a command produced
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Response {
    /// New settings are active, registers written
    Applied(FrequencyPlan),
    /// `show`
    Settings(Settings),
    /// `state`, `None` until a plan has been applied
    State(Option<FrequencyPlan>),
    /// Settings persisted
    Saved,
    /// `help`
    Help(&'static str),
    /// Caller should reset the controller
    Reset,
}


/// Single synthesizer with its console state
pub struct Synthesizer<W, S> {
    board: DeviceConfig,
    settings: Settings,
    plan: Option<FrequencyPlan>,
    writer: W,
    store: S,
}

impl<W, S> Synthesizer<W, S>
where W: RegisterWrite,
      S: SettingsStore,
{
    /// Loads the stored settings, storing defaults if there are none.
    /// Nothing is written to the chip until `apply_settings` or a command.
    pub fn new(board: DeviceConfig, writer: W, mut store: S) -> Result<Self, Error> {
        let settings = match store.load()? {
            Some(settings) => settings,
            None => {
                let settings = Settings::default();
                store.save(&settings)?;
                settings
            }
        };

        Ok(Synthesizer { board, settings, plan: None, writer, store })
    }

    /// Solves and writes the current settings, e.g. at power up
    pub fn apply_settings(&mut self) -> Result<FrequencyPlan, Error> {
        self.apply(self.settings)
    }

    /// Parses and runs one console line
    pub fn execute_line(&mut self, line: &str) -> Result<Response, Error> {
        self.execute(Command::parse(line)?)
    }

    /// Runs a command.
    /// On error the settings, the cached plan and the chip are left as they were.
    pub fn execute(&mut self, cmd: Command) -> Result<Response, Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("command {}", cmd);

        let settings = self.settings;
        match cmd {
            Command::Freq(freq_khz) => self.apply(Settings { freq_khz, ..settings }).map(Response::Applied),
            Command::R(max_r) => self.apply(Settings { max_r, ..settings }).map(Response::Applied),
            Command::Power(power) => self.apply(Settings { power, ..settings }).map(Response::Applied),
            Command::Out(out_on) => self.apply(Settings { out_on, ..settings }).map(Response::Applied),
            Command::Default => self.apply(Settings::default()).map(Response::Applied),
            Command::Show => Ok(Response::Settings(settings)),
            Command::State => Ok(Response::State(self.plan)),
            Command::Save => {
                self.store.save(&settings)?;
                Ok(Response::Saved)
            }
            Command::Help => Ok(Response::Help(HELP)),
            Command::Reset => Ok(Response::Reset),
        }
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Last plan written to the chip
    pub fn plan(&self) -> Option<&FrequencyPlan> {
        self.plan.as_ref()
    }

    pub fn board(&self) -> &DeviceConfig {
        &self.board
    }

    /// Gives back the writer and the store
    pub fn release(self) -> (W, S) {
        (self.writer, self.store)
    }

    fn apply(&mut self, candidate: Settings) -> Result<FrequencyPlan, Error> {
        let cfg = candidate.apply(&self.board);
        let plan = synthesize(candidate.f_out_hz(), &cfg)?;
        self.writer.write_register_set(&plan.registers)?;

        self.settings = candidate;
        self.plan = Some(plan);
        Ok(plan)
    }
}
