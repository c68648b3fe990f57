//! Console front end: solves the dataset's boundary-value problem, then
//! prints either the solution DOFs or solution/deviation tables at
//! user-supplied query points.
//!
//! Exit codes: 0 on success, 1 when loading or solving fails, 2 on a usage
//! error or unknown action.

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use fem1d::{bvp, error::FemError, field::FeField, io, problem, problem::Problem};

fn main() -> ExitCode {
  tracing_subscriber::fmt::init();

  let mut args = std::env::args().skip(1);
  let Some(dir) = args.next() else {
    eprintln!("usage: fem1d <dataset-dir> [problem-name]");
    return ExitCode::from(2);
  };
  let problem_name = args.next().unwrap_or_else(|| {
    Path::new(&dir)
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  });

  let Some(problem) = problem::by_name(&problem_name) else {
    eprintln!("unknown problem {problem_name:?}, expected one of: stepped_source, two_material");
    return ExitCode::from(2);
  };

  match run(&dir, problem.as_ref()) {
    Ok(code) => code,
    Err(err) => {
      eprintln!("error: {err}");
      ExitCode::from(1)
    }
  }
}

fn run(dir: &str, problem: &dyn Problem) -> Result<ExitCode, FemError> {
  let dataset = io::load_dataset(dir)?;
  let solution = bvp::solve_bvp(&dataset, problem)?;
  let field = FeField::new(dataset.mesh(), &solution);

  println!("1) print solution values");
  println!("2) print solution and deviation at query points");

  let mut input = String::new();
  std::io::stdin()
    .read_to_string(&mut input)
    .map_err(|source| fem1d::error::InputError::Io {
      file: "stdin".to_string(),
      source,
    })?;
  let mut tokens = input.split_whitespace();

  match tokens.next() {
    Some("1") => {
      let values: Vec<String> = solution.iter().map(|v| v.to_string()).collect();
      println!("{}", values.join(" "));
      Ok(ExitCode::SUCCESS)
    }
    Some("2") => {
      let Some(count) = tokens.next().and_then(|t| t.parse::<usize>().ok()) else {
        eprintln!("expected the number of query points");
        return Ok(ExitCode::from(2));
      };
      let points: Option<Vec<f64>> = (0..count)
        .map(|_| tokens.next().and_then(|t| t.parse().ok()))
        .collect();
      let Some(points) = points else {
        eprintln!("expected {count} query points");
        return Ok(ExitCode::from(2));
      };

      match points.iter().map(|&x| field.residual(x, problem)).collect::<Option<Vec<f64>>>() {
        Some(deviations) => {
          println!("deviation from reference:");
          let values: Vec<String> = deviations.iter().map(|v| v.to_string()).collect();
          println!("{}", values.join(" "));
        }
        None => println!("problem {:?} carries no analytic reference", problem.name()),
      }

      println!("solution at query points:");
      let values: Vec<String> = points.iter().map(|&x| field.eval(x).to_string()).collect();
      println!("{}", values.join(" "));
      Ok(ExitCode::SUCCESS)
    }
    other => {
      eprintln!("unknown action {:?}", other.unwrap_or(""));
      Ok(ExitCode::from(2))
    }
  }
}
