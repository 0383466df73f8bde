use anyhow::{anyhow, Context, Result};
use clap::{App, Arg};
use log::info;
use mlfq_sched::utils::read_input_file;
use mlfq_sched::{MlfqConfig, MlfqEngine, Process, SortKey, Stats};
use std::cell::RefCell;

// Define a struct to hold the flags
#[derive(Debug, Default)]
struct Flags {
    v_option: bool,
    g_option: bool,
}

// Define a thread-local variable to hold the flags
thread_local!(static TFLAGS: RefCell<Flags> = RefCell::new(Flags::default()));

// prints the scheduling events
macro_rules! v_trace {
    ($($arg:tt)*) => {
        TFLAGS.with(|tflags| {
            let tflags = tflags.borrow();
            if tflags.v_option {
                println!("{}", format_args!($($arg)*));
            }
        });
    };
}

// prints the gantt chart
macro_rules! g_trace {
    ($($arg:tt)*) => {
        TFLAGS.with(|tflags| {
            let tflags = tflags.borrow();
            if tflags.g_option {
                println!("{}", format_args!($($arg)*));
            }
        });
    };
}

fn print_summary(completed: &[Process], order: SortKey, stats: &Stats) {
    println!(
        "{:>6} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5}",
        "PID", "AT", "BT", "FT", "TT", "WT", "RT"
    );
    for p in order.sorted(completed) {
        println!(
            "{:>6} {:5} {:5} {:5} {:5} {:5} {:5}",
            p.id(),
            p.arrival_time(),
            p.burst_time(),
            p.finish_time(),
            p.turnaround_time(),
            p.waiting_time(),
            p.response_time()
        );
    }

    println!(
        "SUM: {} {:.2} {:.2} {:.2} {:.2} {} {:.3}",
        stats.total_time,
        stats.cpu_utilization * 100.0,
        stats.avg_turnaround_time,
        stats.avg_wait_time,
        stats.avg_response_time,
        stats.max_wait_time,
        stats.throughput * 100.0
    );
}

fn actual_main_fn(config: MlfqConfig, order: SortKey, inputfile: &str) -> Result<()> {
    let processes =
        read_input_file(inputfile).with_context(|| format!("failed to load {}", inputfile))?;
    info!("loaded {} processes from {}", processes.len(), inputfile);

    let mut engine = MlfqEngine::new(config);
    engine.run(processes).context("simulation failed")?;

    v_trace!("TRACE");
    v_trace!(" Time |    PID | Queue | Action");
    for event in engine.trace() {
        v_trace!("{}", event);
    }
    g_trace!("GANTT {}", engine.gantt());

    let stats = Stats::compute(engine.completed(), engine.global_time(), engine.busy_ticks());
    print_summary(engine.completed(), order, &stats);
    Ok(())
}

fn valid_schedspec(value: &str) -> Result<(), String> {
    value
        .parse::<MlfqConfig>()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn valid_order(value: &str) -> Result<(), String> {
    value
        .parse::<SortKey>()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn parse_args(actual_args: &Vec<String>) -> Result<(MlfqConfig, SortKey, String)> {
    let matches = App::new("MLFQ scheduler simulator")
        .arg(
            Arg::with_name("schedspec")
                .short('s')
                .long("schedspec")
                .takes_value(true)
                .default_value("4:8:30")
                .validator(valid_schedspec)
                .help("quanta and aging threshold as <q0>:<q1>[:<aging>]"),
        )
        .arg(
            Arg::with_name("order")
                .short('o')
                .long("order")
                .takes_value(true)
                .default_value("c")
                .validator(valid_order)
                .help("summary order: c(ompletion), a(rrival), i(d), f(inish)"),
        )
        .arg(
            Arg::with_name("v_flag")
                .short('v')
                .required(false)
                .help("print the execution trace")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("g_flag")
                .short('g')
                .required(false)
                .help("print the gantt chart")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("inputfile")
                .help("process list: <id> <arrival> <burst> per line")
                .required(true)
                .index(1),
        )
        .get_matches_from(actual_args);

    let config = matches
        .value_of("schedspec")
        .ok_or_else(|| anyhow!("missing schedspec"))?
        .parse::<MlfqConfig>()?;
    let order = matches
        .value_of("order")
        .ok_or_else(|| anyhow!("missing order"))?
        .parse::<SortKey>()?;
    let inputfile = matches
        .value_of("inputfile")
        .ok_or_else(|| anyhow!("missing input file"))?
        .to_string();

    TFLAGS.with(|tflags| {
        let mut tflags = tflags.borrow_mut();
        tflags.v_option = matches.is_present("v_flag");
        tflags.g_option = matches.is_present("g_flag");
    });

    Ok((config, order, inputfile))
}

fn get_default_args() -> Vec<String> {
    vec![
        "mlfq".to_string(),
        "-v".to_string(),
        "-g".to_string(),
        "data/input1".to_string(),
    ]
}

fn main() -> Result<()> {
    env_logger::init();

    let default_args = get_default_args();
    let args = std::env::args().collect::<Vec<String>>();
    let actual_args = if args.len() > 1 { &args } else { &default_args };

    // Parse command line arguments
    let (config, order, inputfile) = parse_args(actual_args)?;
    info!("schedule {} order {:?}", config, order);

    actual_main_fn(config, order, &inputfile)
}
