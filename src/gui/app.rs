use crate::config;
use crate::events::AppEvent;
use crate::fortune::{Fortune, FortuneEvent, PresentationKind};
use crate::gui::theme;
use crate::gui::widget::{FortuneMsg, FortuneOutput, FortuneWidget};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::path::PathBuf;

pub struct AppInit {
    pub fortune: Fortune,
    pub config_path: PathBuf,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    fortune: Controller<FortuneWidget>,
    presentation: PresentationKind,
    labels: Vec<String>,
    selected: usize,
    config_path: PathBuf,
    status: String,
}

/// Maps `draw` in `0..count - 1` onto the indices other than `current`.
fn other_index(current: usize, draw: usize) -> usize {
    if draw >= current { draw + 1 } else { draw }
}

#[derive(Debug)]
pub enum AppMsg {
    Spin(Option<usize>),
    ConfigReload,
    Fortune(FortuneOutput),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Spin(index) => AppMsg::Spin(index),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn label(&self, index: usize) -> &str {
        self.labels.get(index).map_or("?", String::as_str)
    }

    fn on_fortune_event(&mut self, event: FortuneEvent, sender: &ComponentSender<Self>) {
        match event {
            FortuneEvent::AnimationStarted { selected } => {
                self.selected = selected;
                self.status = "Spinning...".to_string();
            }
            FortuneEvent::AnimationEnded { selected } => {
                self.status = self.label(selected).to_string();
            }
            FortuneEvent::FocusChanged(index) => log::trace!("Passing {}", self.label(index)),
            FortuneEvent::Fling { velocity } => {
                log::debug!("Flung at {:.2}", velocity);
                sender.input(AppMsg::Spin(None));
            }
            FortuneEvent::ItemTapped(index) => sender.input(AppMsg::Spin(Some(index))),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Fortune Wheel"),
            set_default_size: (480, 560),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::space {
                        sender.input(AppMsg::Spin(None));
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 6,
                set_margin_all: 12,

                #[local_ref]
                fortune_area -> gtk::DrawingArea {},

                gtk::Label {
                    add_css_class: "fortune-status",
                    #[watch]
                    set_label: &model.status,
                },

                gtk::Button {
                    set_label: "Spin",
                    connect_clicked => AppMsg::Spin(None),
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            fortune,
            config_path,
            events,
        } = init;

        theme::load_css();

        let presentation = fortune.presentation();
        let selected = fortune.selected();
        let labels = fortune
            .items()
            .iter()
            .map(|item| item.label().to_string())
            .collect();

        let controller = FortuneWidget::builder()
            .launch(fortune)
            .forward(sender.input_sender(), AppMsg::Fortune);

        let model = AppModel {
            fortune: controller,
            presentation,
            labels,
            selected,
            config_path,
            status: String::new(),
        };

        let fortune_area = model.fortune.widget();
        let widgets = view_output!();

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Spin(index) => {
                let count = self.labels.len();
                let index = match index {
                    Some(index) => index,
                    None if count > 1 => {
                        other_index(self.selected, rand::random_range(0..count - 1))
                    }
                    None => {
                        log::debug!("Nothing else to spin to");
                        return;
                    }
                };
                self.fortune.emit(FortuneMsg::Select(index));
            }
            AppMsg::ConfigReload => {
                let new_config = match config::load_config(&self.config_path) {
                    Ok(c) => c,
                    Err(e) => {
                        log::error!("Failed to reload config: {}", e);
                        return;
                    }
                };
                match new_config.fortune_config(self.presentation) {
                    Ok(fortune_config) => {
                        self.fortune.emit(FortuneMsg::Reconfigure {
                            items: new_config.items(),
                            config: fortune_config,
                        });
                        log::info!("Configuration reloaded");
                    }
                    Err(e) => log::error!("Failed to reload config: {}", e),
                }
            }
            AppMsg::Fortune(FortuneOutput::Reconfigured(labels)) => self.labels = labels,
            AppMsg::Fortune(FortuneOutput::Event(event)) => self.on_fortune_event(event, &sender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pick_skips_current() {
        let count = 5;
        for current in 0..count {
            let picks: Vec<usize> = (0..count - 1).map(|d| other_index(current, d)).collect();
            let expected: Vec<usize> = (0..count).filter(|&i| i != current).collect();
            assert_eq!(picks, expected);
        }
    }
}
