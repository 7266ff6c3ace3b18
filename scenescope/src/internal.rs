mod driver;
mod step_timer;

pub(crate) use driver::Driver;
pub(crate) use step_timer::StepTimer;
