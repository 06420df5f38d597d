mod goal;
mod helpers;
mod log;
mod search;
mod summary;
mod workout;

pub(crate) use goal::{cmd_goal_set, cmd_goal_show};
pub(crate) use log::{cmd_eat, cmd_log};
pub(crate) use search::cmd_search;
pub(crate) use summary::cmd_summary;
pub(crate) use workout::{cmd_workout_list, cmd_workout_seed};
