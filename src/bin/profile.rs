//! Profiling driver: searches from every start square of several boards.
//! Build with `--features hotpath` to get timing reports for the
//! instrumented search functions.

use knights_tour::{Solver, Square};

#[hotpath::main]
fn main() {
    for size in [6usize, 8, 10, 16] {
        let solver = match Solver::new(size) {
            Ok(solver) => solver,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let mut found = 0;
        let mut backtracks = 0;
        for start in solver.squares() {
            let Ok(mut search) = solver.search(start) else {
                continue;
            };
            while search.next_event().is_some() {}
            backtracks += search.backtracks();
            if search.into_outcome().is_complete() {
                found += 1;
            }
        }

        println!(
            "{size}x{size}: {found}/{} starts toured, {backtracks} backtracks",
            size * size
        );
    }

    let corner = Square::new(0, 0);
    if let Ok(outcome) = Solver::standard().solve(corner) {
        println!("{outcome} from {corner}");
        if let Some(tour) = outcome.tour() {
            print!("{tour}");
        }
    }
}
