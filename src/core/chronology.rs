//! Chronology: the single time authority
//!
//! Ticks map to hours, days, months, and years. `advance` returns the
//! transitions that occurred so the engine can react in a fixed order.
//! Weather is drawn once per new day from a season-dependent table, using
//! the engine's RNG so the daily draw is part of the deterministic stream.

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::{Era, Tick};

/// Day phases for pacing and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Morning,   // 06:00-12:00
    Afternoon, // 12:00-18:00
    Evening,   // 18:00-22:00
    Night,     // 22:00-06:00
}

impl DayPhase {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPhase::Morning,
            12..=17 => DayPhase::Afternoon,
            18..=21 => DayPhase::Evening,
            _ => DayPhase::Night, // 22-23, 0-5
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    /// Seasonal multiplier on production-chain outputs
    pub fn production_modifier(&self) -> f64 {
        match self {
            Season::Winter => 0.5,
            Season::Spring => 1.0,
            Season::Summer => 1.2,
            Season::Autumn => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Overcast,
    Rain,
    Snow,
    Frost,
    Heatwave,
}

impl Weather {
    /// Per-season draw table; order matches the weight slices below
    const TABLE: [[(Weather, f64); 4]; 4] = [
        // Winter
        [
            (Weather::Snow, 0.4),
            (Weather::Frost, 0.3),
            (Weather::Overcast, 0.2),
            (Weather::Clear, 0.1),
        ],
        // Spring
        [
            (Weather::Rain, 0.3),
            (Weather::Overcast, 0.3),
            (Weather::Clear, 0.4),
            (Weather::Snow, 0.0),
        ],
        // Summer
        [
            (Weather::Clear, 0.5),
            (Weather::Rain, 0.2),
            (Weather::Heatwave, 0.2),
            (Weather::Overcast, 0.1),
        ],
        // Autumn
        [
            (Weather::Rain, 0.4),
            (Weather::Overcast, 0.4),
            (Weather::Clear, 0.2),
            (Weather::Frost, 0.0),
        ],
    ];

    pub fn draw(season: Season, rng: &mut SimRng) -> Self {
        let row = &Self::TABLE[match season {
            Season::Winter => 0,
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Autumn => 3,
        }];
        let weights: Vec<f64> = row.iter().map(|(_, w)| *w).collect();
        row[rng.pick(&weights)].0
    }
}

/// Calendar date derived from the tick counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimDate {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// 1-based day of month
    pub day: u32,
    /// 0-23
    pub hour: u32,
}

/// Transitions produced by a single `advance` call, in emission order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChronoEvent {
    DayPhaseChanged(DayPhase),
    NewDay,
    WeatherChanged(Weather),
    NewMonth,
    SeasonChanged(Season),
    NewYear(i32),
    EraChanged(Era),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chronology {
    tick: Tick,
    ticks_per_day: u64,
    days_per_month: u32,
    start_year: i32,
    weather: Weather,
}

impl Chronology {
    pub fn new(ticks_per_day: u64, days_per_month: u32, start_year: i32) -> Self {
        Self {
            tick: 0,
            ticks_per_day,
            days_per_month,
            start_year,
            weather: Weather::Frost, // tick zero lands in winter
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }

    pub fn date(&self) -> SimDate {
        self.date_at(self.tick)
    }

    fn date_at(&self, tick: Tick) -> SimDate {
        let total_days = tick / self.ticks_per_day;
        let days_per_year = (self.days_per_month as u64) * 12;
        let year = self.start_year + (total_days / days_per_year) as i32;
        let day_of_year = (total_days % days_per_year) as u32;
        let month = day_of_year / self.days_per_month + 1;
        let day = day_of_year % self.days_per_month + 1;
        let tick_in_day = tick % self.ticks_per_day;
        let hour = ((tick_in_day * 24) / self.ticks_per_day) as u32;
        SimDate {
            year,
            month,
            day,
            hour,
        }
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.date().month)
    }

    pub fn day_phase(&self) -> DayPhase {
        DayPhase::from_hour(self.date().hour)
    }

    pub fn era(&self) -> Era {
        Era::from_year(self.date().year)
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    /// Months where heating fuel is burned (October through March)
    pub fn is_heating_season(month: u32) -> bool {
        matches!(month, 10..=12 | 1..=3)
    }

    /// Advance one tick and report every transition that occurred.
    /// Exactly one weather draw happens per new day, whether or not the
    /// weather actually changes, so the RNG stream stays aligned.
    pub fn advance(&mut self, rng: &mut SimRng) -> Vec<ChronoEvent> {
        let before = self.date_at(self.tick);
        let phase_before = DayPhase::from_hour(before.hour);
        self.tick += 1;
        let after = self.date_at(self.tick);
        let phase_after = DayPhase::from_hour(after.hour);

        let mut events = Vec::new();
        if phase_after != phase_before {
            events.push(ChronoEvent::DayPhaseChanged(phase_after));
        }
        let new_day = (self.tick / self.ticks_per_day) != ((self.tick - 1) / self.ticks_per_day);
        if new_day {
            events.push(ChronoEvent::NewDay);
            let drawn = Weather::draw(Season::from_month(after.month), rng);
            if drawn != self.weather {
                self.weather = drawn;
                events.push(ChronoEvent::WeatherChanged(drawn));
            }
        }
        if after.month != before.month || after.year != before.year {
            events.push(ChronoEvent::NewMonth);
            let season_after = Season::from_month(after.month);
            if season_after != Season::from_month(before.month) {
                events.push(ChronoEvent::SeasonChanged(season_after));
            }
        }
        if after.year != before.year {
            events.push(ChronoEvent::NewYear(after.year));
            let era_after = Era::from_year(after.year);
            if era_after != Era::from_year(before.year) {
                events.push(ChronoEvent::EraChanged(era_after));
            }
        }
        events
    }
}
