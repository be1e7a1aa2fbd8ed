//! Cross-component frame scenarios run against the headless backend

mod frame_scenarios;
