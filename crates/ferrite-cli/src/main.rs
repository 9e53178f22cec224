use clap::Parser;
use ferrite_result::ResultTable;
use ferrite_solver::config::SolverConfig;
use ferrite_solver::solver::Solver;

/// Ferrite is a SPICE-like circuit simulator written in Rust.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file to simulate.
    #[arg()]
    netlist_file: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let path = std::path::Path::new(&args.netlist_file);
    let netlist = ferrite_parser::parser::parse_netlist_file(path).unwrap_or_else(|e| {
        eprintln!("Error parsing netlist '{}': {e}", args.netlist_file);
        std::process::exit(1);
    });

    let config = SolverConfig::default();
    let solver = Solver::new(netlist.circuit, config);

    let result = solver.solve(netlist.directive).unwrap_or_else(|e| {
        eprintln!("Error during analysis: {e}");
        std::process::exit(1);
    });

    let table = match result {
        ferrite_solver::AnalysisResult::Transient(data) => ResultTable::from_transient(&data),
        ferrite_solver::AnalysisResult::Ac(data) => ResultTable::from_ac(&data),
    };

    print!("{}", table.to_plain_text());
}
