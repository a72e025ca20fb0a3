use rand::Rng;
use rl_logger::{Accumulator, DisplayHints, Logger, Update};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const TRAINING_STEPS: u64 = 500_001;
const TRAIN_REPORT_FREQ: u64 = 50_000;
const EVAL_FREQ: u64 = 250_000;
const EVAL_STEPS: u64 = 15_000;
const EVAL_EPISODE_LEN: u64 = 150;
const EVAL_REPORT_FREQ: u64 = 5_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut log = Logger::create("experiment1", Some(PathBuf::from("./demo_results")))?;

    let mut train_log = log.add_group(
        Some("training"),
        [Accumulator::max("max_q")?, Accumulator::rate("steps_per_sec")?],
        DisplayHints::parse(Some("white"), Some("on_blue"), &["bold"])?,
    )?;

    let mut eval_log = log.add_group(
        Some("evaluation"),
        [
            Accumulator::episodic_average("rw_per_ep")?.emphasized(),
            Accumulator::average("rw_per_step")?,
            Accumulator::max("max_q")?,
        ],
        DisplayHints::parse(Some("white"), Some("on_magenta"), &["bold"])?,
    )?;

    let mut rng = rand::thread_rng();
    log.log_time(&train_log)?;

    for step in 0..TRAINING_STEPS {
        // train
        let q = rng.gen::<f64>() * rng.gen_range(0..=step) as f64;
        train_log.update([("max_q", q), ("steps_per_sec", 1.0)])?;

        if step % TRAIN_REPORT_FREQ == 0 && step != 0 {
            log.emit(&train_log, step)?;
            log.reset(&mut train_log);
        }

        // evaluate
        if step % EVAL_FREQ == 0 && step != 0 {
            for i in 1..=EVAL_STEPS {
                let done = i % EVAL_EPISODE_LEN == 0;
                let r = rng.gen_range(0..=50) as f64;
                let q = rng.gen::<f64>() * rng.gen_range(0..=10) as f64;

                let updates: [(&str, Update); 3] = [
                    ("rw_per_ep", (r, u64::from(done)).into()),
                    ("rw_per_step", r.into()),
                    ("max_q", q.into()),
                ];
                eval_log.update(updates)?;

                if i % EVAL_REPORT_FREQ == 0 {
                    log.emit(&eval_log, step)?;
                }
            }
            log.reset(&mut eval_log);
        }
    }

    log.emit(&train_log, TRAINING_STEPS - 1)?;
    log.log_info(&train_log, "done.")?;
    Ok(())
}
