//! Duck Arcade entry point
//!
//! In the browser this wires the three games to the DOM and drives the canvas
//! games from `requestAnimationFrame`. Natively it runs every game headless
//! with a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

    use duck_arcade::consts::{SCREEN_H, SCREEN_W};
    use duck_arcade::renderer::{Hud, RenderState, Scene, Vertex};
    use duck_arcade::sim::{
        Clicker, EffectId, FrameOutcome, Game, Intent, ParkourGame, PendingRemovals, RacerGame,
        RunSummary, Session, intent_for_key,
    };
    use duck_arcade::{DisplaySettings, Tuning, Wallet};

    type Shared<T> = Rc<RefCell<T>>;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(el: &Element, class: &str, on: bool) {
        let classes = el.class_list();
        let _ = if on {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = element(id) {
            set_class(&el, "hidden", hidden);
        }
    }

    fn listen<E: FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        match element(id) {
            Some(el) => listen(&el, "click", handler),
            None => log::warn!("#{} not found, control disabled", id),
        }
    }

    fn show_balance(wallet: &Wallet) {
        set_text("wallet-balance", &wallet.balance().to_string());
    }

    /// One canvas game with its DOM chrome and frame scheduling
    struct CanvasHost<G> {
        /// Element id prefix (`parkour`, `racer`)
        prefix: &'static str,
        session: Session<G>,
        render_state: Option<RenderState>,
        display: DisplaySettings,
        wallet: Shared<Wallet>,
        /// Pending `requestAnimationFrame` request, if any
        raf_handle: Option<i32>,
    }

    impl<G: Game + Scene + 'static> CanvasHost<G> {
        fn new(prefix: &'static str, game: G, display: DisplaySettings, wallet: Shared<Wallet>) -> Self {
            Self {
                prefix,
                session: Session::new(game),
                render_state: None,
                display,
                wallet,
                raf_handle: None,
            }
        }

        fn id(&self, suffix: &str) -> String {
            format!("{}-{}", self.prefix, suffix)
        }

        fn start(&mut self) -> bool {
            if self.render_state.is_none() {
                log::warn!("{}: no render context, not starting", self.prefix);
                return false;
            }
            if !self.session.start() {
                return false;
            }
            self.show_playing();
            true
        }

        fn restart(&mut self) -> bool {
            if self.render_state.is_none() {
                log::warn!("{}: no render context, not restarting", self.prefix);
                return false;
            }
            self.session.restart();
            self.show_playing();
            true
        }

        fn press(&mut self, intent: Intent) -> bool {
            self.session.press(intent)
        }

        /// Run one scheduled frame; returns whether to schedule another
        fn step(&mut self) -> bool {
            self.raf_handle = None;
            if self.render_state.is_none() {
                log::warn!("{}: render context gone, stopping", self.prefix);
                self.session.teardown();
                return false;
            }

            let wallet = self.wallet.clone();
            let mut earned = false;
            let outcome = self.session.frame(&mut |amount: u32| {
                wallet.borrow_mut().deposit(u64::from(amount));
                earned = true;
            });
            if earned {
                show_balance(&self.wallet.borrow());
            }

            match outcome {
                FrameOutcome::Continue => {
                    self.present();
                    true
                }
                FrameOutcome::Died(summary) => {
                    self.show_summary(summary);
                    false
                }
                FrameOutcome::Halted => false,
            }
        }

        /// Build and draw the current frame, then mirror its HUD into the DOM
        fn present(&mut self) {
            let frame = self.session.game().frame(&self.display);
            self.draw(&frame.vertices);
            self.update_hud(frame.hud);
        }

        fn draw(&mut self, vertices: &[Vertex]) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            match render_state.render(vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("{}: surface lost, reconfiguring", self.prefix);
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("{}: out of GPU memory", self.prefix);
                }
                Err(e) => log::warn!("{}: render error: {:?}", self.prefix, e),
            }
        }

        fn update_hud(&self, hud: Hud) {
            set_text(&self.id("distance"), &format!("{} m", hud.distance));
            set_text(&self.id("coins"), &hud.coins.to_string());
        }

        fn show_playing(&self) {
            set_hidden(&self.id("start"), true);
            set_hidden(&self.id("over"), true);
            set_hidden(&self.id("hud"), !self.display.show_hud);
            self.update_hud(Hud::from(self.session.game().stats()));
        }

        fn show_summary(&self, summary: RunSummary) {
            set_text(&self.id("final-distance"), &format!("{} m", summary.distance));
            set_text(&self.id("final-coins"), &summary.coins.to_string());
            set_hidden(&self.id("over"), false);
        }

        /// Leaving the view: cancel the pending frame and go idle
        fn teardown(&mut self) {
            if let Some(handle) = self.raf_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            self.session.teardown();
            set_hidden(&self.id("over"), true);
            set_hidden(&self.id("start"), false);
        }
    }

    fn schedule<G: Game + Scene + 'static>(host: &Shared<CanvasHost<G>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = host.clone();
        let callback = Closure::once_into_js(move |_time: f64| {
            let keep_going = next.borrow_mut().step();
            if keep_going {
                schedule(&next);
            }
        });
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => host.borrow_mut().raf_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    /// Start the frame loop unless one is already pending
    fn launch<G: Game + Scene + 'static>(host: &Shared<CanvasHost<G>>) {
        if host.borrow().raf_handle.is_none() {
            schedule(host);
        }
    }

    fn wire_canvas_game<G: Game + Scene + 'static>(host: &Shared<CanvasHost<G>>) {
        let prefix = host.borrow().prefix;
        {
            let host = host.clone();
            on_click(&format!("{}-start-btn", prefix), move |_| {
                let started = host.borrow_mut().start();
                if started {
                    launch(&host);
                }
            });
        }
        {
            let host = host.clone();
            on_click(&format!("{}-restart-btn", prefix), move |_| {
                let restarted = host.borrow_mut().restart();
                if restarted {
                    launch(&host);
                }
            });
        }
    }

    fn wire_control<G: Game + Scene + 'static>(host: &Shared<CanvasHost<G>>, id: &str, intent: Intent) {
        let Some(el) = element(id) else {
            log::warn!("#{} not found, control disabled", id);
            return;
        };
        let host = host.clone();
        // pointerdown fires on touch without waiting for the click delay
        listen(&el, "pointerdown", move |event: PointerEvent| {
            event.prevent_default();
            host.borrow_mut().press(intent);
        });
    }

    async fn init_render(instance: &wgpu::Instance, canvas_id: &str) -> Option<RenderState> {
        let window = web_sys::window()?;
        let canvas: HtmlCanvasElement = match element(canvas_id).map(|el| el.dyn_into()) {
            Some(Ok(canvas)) => canvas,
            _ => {
                log::error!("#{} is missing or not a canvas", canvas_id);
                return None;
            }
        };

        // Size the backing store from the logical playfield; CSS scales it
        let dpr = window.device_pixel_ratio();
        let width = (SCREEN_W as f64 * dpr) as u32;
        let height = (SCREEN_H as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("{}: failed to create surface: {}", canvas_id, e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("{}: no GPU adapter: {}", canvas_id, e);
                return None;
            }
        };
        log::info!("{}: using adapter {:?}", canvas_id, adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("{}: failed to create device: {}", canvas_id, e);
                None
            }
        }
    }

    /// The clicker view: DOM only, effects removed on timers
    struct ClickerHost {
        clicker: Clicker,
        wallet: Shared<Wallet>,
        /// `setTimeout` handles for effects still on screen
        timers: PendingRemovals<i32>,
        ripples: Vec<(EffectId, Element)>,
    }

    impl ClickerHost {
        fn new(clicker: Clicker, wallet: Shared<Wallet>) -> Self {
            Self {
                clicker,
                wallet,
                timers: PendingRemovals::new(),
                ripples: Vec::new(),
            }
        }

        fn refresh(&self) {
            set_text("clicker-coins", &self.clicker.coins.to_string());
            set_text("clicker-clicks", &self.clicker.clicks.to_string());
            set_text("clicker-per-click", &format!("+{}", self.clicker.per_click));
            for (i, upgrade) in self.clicker.upgrades.iter().enumerate() {
                let Some(button) = element(&format!("clicker-upgrade-{}", i)) else {
                    continue;
                };
                button.set_text_content(Some(&format!(
                    "{} (+{}/click) {} coins [x{}]",
                    upgrade.name, upgrade.bonus, upgrade.cost, upgrade.count
                )));
                let _ = if self.clicker.can_afford(i) {
                    button.remove_attribute("disabled")
                } else {
                    button.set_attribute("disabled", "")
                };
            }
        }

        fn spawn_ripple(&mut self, id: EffectId, pos: Vec2, amount: u64) {
            let (Some(doc), Some(field)) = (document(), element("clicker-field")) else {
                return;
            };
            let Ok(span) = doc.create_element("span") else {
                return;
            };
            span.set_class_name("ripple");
            span.set_text_content(Some(&format!("+{}", amount)));
            let _ = span.set_attribute("style", &format!("left:{}px;top:{}px", pos.x, pos.y));
            if field.append_child(&span).is_ok() {
                self.ripples.push((id, span));
            }
        }

        /// A removal timer fired
        fn expire(&mut self, id: EffectId) {
            self.timers.fired(id);
            if !self.clicker.expire(id) {
                return;
            }
            if let Some(index) = self.ripples.iter().position(|(r, _)| *r == id) {
                let (_, span) = self.ripples.remove(index);
                span.remove();
            }
            if !self.clicker.is_shaking() {
                if let Some(duck) = element("clicker-duck") {
                    set_class(&duck, "shake", false);
                }
            }
        }

        fn teardown(&mut self) {
            if let Some(window) = web_sys::window() {
                for handle in self.timers.drain() {
                    window.clear_timeout_with_handle(handle);
                }
            }
            for (_, span) in self.ripples.drain(..) {
                span.remove();
            }
            self.clicker.clear_effects();
            if let Some(duck) = element("clicker-duck") {
                set_class(&duck, "shake", false);
            }
        }
    }

    fn arm_timer(host: &Shared<ClickerHost>, id: EffectId, ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let target = host.clone();
        let callback = Closure::once_into_js(move || {
            target.borrow_mut().expire(id);
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            ms as i32,
        ) {
            Ok(handle) => host.borrow_mut().timers.insert(id, handle),
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
    }

    fn clicker_click(host: &Shared<ClickerHost>, event: &MouseEvent) {
        let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
        let outcome = {
            let mut h = host.borrow_mut();
            let wallet = h.wallet.clone();
            let outcome = h.clicker.click(pos, &mut |amount: u32| {
                wallet.borrow_mut().deposit(u64::from(amount));
            });
            show_balance(&wallet.borrow());
            h.spawn_ripple(outcome.ripple, pos, outcome.earned);
            if let Some(duck) = element("clicker-duck") {
                set_class(&duck, "shake", true);
            }
            h.refresh();
            outcome
        };
        arm_timer(host, outcome.ripple, outcome.ripple_ms);
        arm_timer(host, outcome.shake, outcome.shake_ms);
    }

    fn build_upgrade_buttons(host: &Shared<ClickerHost>) {
        let (Some(doc), Some(list)) = (document(), element("clicker-upgrades")) else {
            log::warn!("#clicker-upgrades not found, upgrades disabled");
            return;
        };
        let count = host.borrow().clicker.upgrades.len();
        for index in 0..count {
            let Ok(button) = doc.create_element("button") else {
                continue;
            };
            button.set_id(&format!("clicker-upgrade-{}", index));
            button.set_class_name("upgrade");
            if list.append_child(&button).is_err() {
                continue;
            }
            let host = host.clone();
            listen(&button, "click", move |_: MouseEvent| {
                let mut h = host.borrow_mut();
                if h.clicker.buy_upgrade(index) {
                    h.refresh();
                }
            });
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        Home,
        Clicker,
        Parkour,
        Racer,
    }

    impl View {
        const ALL: [View; 4] = [View::Home, View::Clicker, View::Parkour, View::Racer];

        fn name(self) -> &'static str {
            match self {
                View::Home => "home",
                View::Clicker => "clicker",
                View::Parkour => "parkour",
                View::Racer => "racer",
            }
        }
    }

    struct App {
        view: View,
        parkour: Shared<CanvasHost<ParkourGame>>,
        racer: Shared<CanvasHost<RacerGame>>,
        clicker: Shared<ClickerHost>,
    }

    impl App {
        fn switch_to(&mut self, view: View) {
            if view != self.view {
                self.leave(self.view);
            }
            for v in View::ALL {
                set_hidden(&format!("view-{}", v.name()), v != view);
                if let Some(nav) = element(&format!("nav-{}", v.name())) {
                    set_class(&nav, "active", v == view);
                }
            }
            self.view = view;
            log::info!("Showing {:?}", view);
        }

        fn leave(&self, view: View) {
            match view {
                View::Parkour => self.parkour.borrow_mut().teardown(),
                View::Racer => self.racer.borrow_mut().teardown(),
                View::Clicker => self.clicker.borrow_mut().teardown(),
                View::Home => {}
            }
        }

        fn teardown_all(&self) {
            for view in View::ALL {
                self.leave(view);
            }
        }

        fn press(&self, intent: Intent) -> bool {
            match self.view {
                View::Parkour => self.parkour.borrow_mut().press(intent),
                View::Racer => self.racer.borrow_mut().press(intent),
                View::Home | View::Clicker => false,
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Duck Arcade starting...");

        let window = web_sys::window().expect("no window");
        let tuning = Tuning::load();
        let wallet = Rc::new(RefCell::new(Wallet::default()));
        show_balance(&wallet.borrow());

        let seed = js_sys::Date::now() as u64;
        log::info!("Seeding games with {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let parkour = Rc::new(RefCell::new(CanvasHost::new(
            "parkour",
            ParkourGame::with_seed(tuning.parkour.clone(), seed),
            tuning.display.clone(),
            wallet.clone(),
        )));
        let racer = Rc::new(RefCell::new(CanvasHost::new(
            "racer",
            RacerGame::with_seed(tuning.racer.clone(), seed.wrapping_add(1)),
            tuning.display.clone(),
            wallet.clone(),
        )));
        // Draw the idle scene so each canvas shows the start position
        parkour.borrow_mut().render_state = init_render(&instance, "parkour-canvas").await;
        parkour.borrow_mut().present();
        racer.borrow_mut().render_state = init_render(&instance, "racer-canvas").await;
        racer.borrow_mut().present();

        wire_canvas_game(&parkour);
        wire_canvas_game(&racer);
        wire_control(&parkour, "parkour-jump-btn", Intent::Jump);
        wire_control(&parkour, "parkour-canvas", Intent::Jump);
        wire_control(&racer, "racer-left-btn", Intent::MoveLeft);
        wire_control(&racer, "racer-right-btn", Intent::MoveRight);

        let clicker = Rc::new(RefCell::new(ClickerHost::new(
            Clicker::new(&tuning.clicker),
            wallet.clone(),
        )));
        build_upgrade_buttons(&clicker);
        clicker.borrow().refresh();
        {
            let clicker = clicker.clone();
            on_click("clicker-duck", move |event: MouseEvent| {
                clicker_click(&clicker, &event)
            });
        }

        let app = Rc::new(RefCell::new(App {
            view: View::Home,
            parkour,
            racer,
            clicker,
        }));

        for view in View::ALL {
            let app = app.clone();
            on_click(&format!("nav-{}", view.name()), move |_| {
                app.borrow_mut().switch_to(view)
            });
        }

        {
            let app = app.clone();
            listen(&window, "keydown", move |event: KeyboardEvent| {
                let Some(intent) = intent_for_key(&event.key()) else {
                    return;
                };
                if app.borrow().press(intent) {
                    event.prevent_default();
                }
            });
        }
        {
            let app = app.clone();
            listen(&window, "pagehide", move |_: web_sys::Event| {
                log::info!("Page hidden, tearing down");
                app.borrow().teardown_all();
            });
        }

        app.borrow_mut().switch_to(View::Home);
        set_hidden("loading", true);

        log::info!("Duck Arcade running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use duck_arcade::consts::RACER_Y;
    use duck_arcade::sim::{
        Clicker, FrameOutcome, Game, Intent, ParkourGame, RacerGame, RunSummary, Session,
    };
    use duck_arcade::{Tuning, Wallet};
    use glam::Vec2;

    /// Give up on a run that survives this long
    const MAX_FRAMES: u64 = 60 * 60 * 5;
    /// Racer looks this far above its own top edge for traffic
    const RACER_LOOKAHEAD: f32 = 160.0;

    /// Jump when the ground under the duck runs out just ahead
    fn parkour_autopilot(game: &ParkourGame) -> Option<Intent> {
        if !game.player.grounded {
            return None;
        }
        let duck = game.player.bounds();
        let under_ends_soon = game
            .platforms
            .iter()
            .map(|p| p.bounds(game.world_x))
            .filter(|b| b.min.x <= duck.max.x && b.max.x >= duck.min.x)
            .all(|b| b.max.x < duck.max.x + 24.0);
        under_ends_soon.then_some(Intent::Jump)
    }

    /// Steer towards the nearest lane with no traffic coming
    fn racer_autopilot(game: &RacerGame) -> Option<Intent> {
        let lanes = game.tuning.lane_count.max(1);
        let blocked = |lane: usize| {
            game.enemies
                .iter()
                .any(|e| e.lane == lane && e.y > RACER_Y - RACER_LOOKAHEAD && e.y < RACER_Y + 60.0)
        };
        let lane = game.player.lane;
        if !blocked(lane) {
            return None;
        }
        if lane > 0 && !blocked(lane - 1) {
            Some(Intent::MoveLeft)
        } else if lane + 1 < lanes && !blocked(lane + 1) {
            Some(Intent::MoveRight)
        } else {
            None
        }
    }

    fn run_session<G: Game>(
        game: G,
        wallet: &mut Wallet,
        pilot: impl Fn(&G) -> Option<Intent>,
    ) -> Option<RunSummary> {
        let mut session = Session::new(game);
        session.start();
        for _ in 0..MAX_FRAMES {
            if let Some(intent) = pilot(session.game()) {
                session.press(intent);
            }
            match session.frame(wallet) {
                FrameOutcome::Continue => {}
                FrameOutcome::Died(summary) => return Some(summary),
                FrameOutcome::Halted => break,
            }
        }
        log::info!("{} survived {} frames, stopping", session.game().name(), MAX_FRAMES);
        session.teardown();
        None
    }

    pub fn run(seed: u64) {
        let tuning = Tuning::default();
        let mut wallet = Wallet::default();
        log::info!("Headless run with seed {} (wallet {})", seed, wallet.balance());

        let parkour = ParkourGame::with_seed(tuning.parkour.clone(), seed);
        if let Some(summary) = run_session(parkour, &mut wallet, parkour_autopilot) {
            println!("Parkour: {} m, {} coins", summary.distance, summary.coins);
        }

        let racer = RacerGame::with_seed(tuning.racer.clone(), seed);
        if let Some(summary) = run_session(racer, &mut wallet, racer_autopilot) {
            println!("Racer:   {} m, {} coins", summary.distance, summary.coins);
        }

        let mut clicker = Clicker::new(&tuning.clicker);
        for i in 0..500 {
            clicker.click(Vec2::new(i as f32 % 100.0, 0.0), &mut wallet);
            clicker.clear_effects();
            for index in (0..clicker.upgrades.len()).rev() {
                clicker.buy_upgrade(index);
            }
        }
        println!(
            "Clicker: {} clicks, +{} per click, {} coins left",
            clicker.clicks, clicker.per_click, clicker.coins
        );

        println!("Wallet:  {}", wallet.balance());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Duck Arcade (native) starting...");
    log::info!("The browser build runs with `trunk serve`; running headless autopilots");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run(seed);
}
