use dux::{eval_program, parse, Environment};
use std::time::Instant;

fn main() {
    let input = "
        let fib = fn(n) {
            if (n == 0) {
                return 0;
            } else {
                if (n == 1) {
                    return 1;
                } else {
                    return fib(n - 1) + fib(n - 2);
                }
            }
        };
        fib(25);
    ";
    let (program, errors) = parse(input);
    assert!(errors.is_empty(), "{:?}", errors);
    let env = Environment::new().into_env();

    let start = Instant::now();
    let result = eval_program(&program, &env);
    let end = Instant::now();

    println!("Program");
    println!("{}", input);
    println!("took {} seconds", end.duration_since(start).as_secs_f64());
    println!("result: {}", result);
}
