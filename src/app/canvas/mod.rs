mod commit;
mod interaction;
mod view;
