//! Independent executions running in parallel

use std::sync::{Arc, Barrier};
use std::thread;

use concopy_core::catalog;
use concopy_core::{CopyFunction, FunctionResult, PageContext, execute_copy_function};
use concopy_testkit::fixtures;

/// Every thread runs every catalog entry plus a code function against its
/// own page; results must match a sequential run.
#[test]
fn test_parallel_executions_match_sequential() {
    const NUM_THREADS: usize = 8;

    let functions: Arc<Vec<CopyFunction>> = Arc::new(
        catalog::templates()
            .iter()
            .map(|t| CopyFunction::from_template(t.id, t.name, t.id))
            .chain(std::iter::once(CopyFunction::from_code(
                "code",
                "Code",
                fixtures::MARKDOWN_SOURCE,
            )))
            .collect(),
    );

    let page_for = |i: usize| {
        PageContext::new(format!("Page {i} <&>"), format!("https://ex.com/{i}"))
            .with_selection(if i % 2 == 0 { "" } else { "sel" })
            .with_meta("description", format!("d{i}"))
    };
    let run = |functions: &[CopyFunction], page: &PageContext| -> Vec<FunctionResult> {
        functions
            .iter()
            .map(|f| execute_copy_function(f, page).unwrap())
            .collect()
    };

    let expected: Vec<Vec<FunctionResult>> =
        (0..NUM_THREADS).map(|i| run(functions.as_slice(), &page_for(i))).collect();

    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let functions = Arc::clone(&functions);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let page = page_for(i);
                barrier.wait();
                (0..20).map(|_| run(functions.as_slice(), &page)).last().unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), expected[i], "thread {i}");
    }
}
