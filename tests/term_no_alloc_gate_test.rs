use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use card_crush::core::{Session, SessionSnapshot};
use card_crush::term::{FrameBuffer, GameView, HudView, Viewport};
use card_crush::types::Pos;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn term_game_view_render_is_allocation_free_after_warmup() {
    let view = GameView::default();
    let viewport = Viewport::new(90, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    let mut session = Session::new("abc").unwrap();
    session.tap(Pos::new(0, 0));
    session.tap(Pos::new(0, 1));
    session.tap(Pos::new(3, 3));

    let mut snap = SessionSnapshot::default();
    let hud = HudView {
        message: Some("a1r"),
        ..HudView::new("Level 1", Pos::new(3, 3))
    };

    // Warm-up (resize, snapshot buffers).
    session.snapshot_into(&mut snap);
    view.render_into(&snap, &hud, viewport, &mut fb);

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            session.snapshot_into(&mut snap);
            view.render_into(&snap, &hud, viewport, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
